//! `fabterm` - print images and big, colorful text in a 256-color terminal.

use clap::{Parser, Subcommand};
use fabterm::{parse_color, text, DebugLog, ImageArt, RenderConfig, TextOptions};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Command-line arguments for `fabterm`.
#[derive(Parser, Debug)]
#[command(
    name = "fabterm",
    version,
    about = "Print images and fabulous text as xterm-256 art",
    long_about = "Renders images and TrueType text into rows of colored spaces, using as few escape codes as possible."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Your terminal's background, so semi-transparent pixels blend properly
    #[arg(short = 'B', long, value_name = "COLOR", default_value = "black", global = true)]
    term_color: String,

    /// Show where escape codes would go instead of printing colors
    #[arg(long, action, global = true)]
    debug: bool,

    /// Write debug logs to file
    #[arg(long, value_name = "FILE", global = true)]
    debug_log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print image files
    Image {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Width in columns (default: image width, at most the terminal width)
        #[arg(short, long)]
        width: Option<u32>,
    },
    /// Print text drawn with a TrueType font
    Text {
        /// Words to print; newlines start another row of text
        #[arg(required_unless_present = "list")]
        words: Vec<String>,

        /// Font name or path to a font file
        #[arg(short = 'F', long, default_value = "DejaVuSans-Bold")]
        font: String,

        /// Font size in pixels
        #[arg(short = 'Z', long, default_value_t = 23.0)]
        size: f32,

        /// Text color, as in HTML/CSS
        #[arg(short = 'C', long, default_value = "#0099ff")]
        color: String,

        /// Skew in pixels, the top of the text leans right
        #[arg(short = 'S', long)]
        skew: Option<u32>,

        /// Draw a drop shadow under the text
        #[arg(short, long, action)]
        shadow: bool,

        /// List available fonts
        #[arg(short, long, action)]
        list: bool,
    },
}

fn print_art(out: &mut impl Write, art: &ImageArt, debug: bool) -> io::Result<()> {
    if debug {
        for line in art.debug_lines() {
            writeln!(out, "{}", line)?;
        }
    } else {
        for line in art.lines() {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}

fn run(cli: Cli) -> io::Result<()> {
    let log = cli.debug_log.map(DebugLog::to_file).unwrap_or_default();
    log.log("Starting fabterm execution.");

    let term_bg = parse_color(&cli.term_color)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match cli.command {
        Command::Image { files, width } => {
            let config = RenderConfig { width, term_bg, log };
            for file in &files {
                let art = ImageArt::open(file, &config)?;
                print_art(&mut out, &art, cli.debug)?;
            }
            config.log.log(format!("Printed {} image(s).", files.len()));
        }
        Command::Text { list: true, .. } => {
            for name in text::list_fonts() {
                writeln!(out, "{}", name)?;
            }
        }
        Command::Text { words, font, size, color, skew, shadow, .. } => {
            let config = RenderConfig { width: None, term_bg, log };
            let opts = TextOptions { font, size, color, shadow, skew };
            for line in words.join(" ").split('\n') {
                let art = text::render(line, &opts, &config)?;
                print_art(&mut out, &art, cli.debug)?;
            }
        }
    }
    out.flush()
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let log = cli.debug_log.clone().map(DebugLog::to_file).unwrap_or_default();
    if let Err(e) = run(cli) {
        log.log(format!("Error: {}", e));
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        eprintln!("fabterm: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_text_defaults() {
        let cli = Cli::try_parse_from(["fabterm", "text", "hello", "world"]).unwrap();
        assert_eq!(cli.term_color, "black");
        match cli.command {
            Command::Text { words, font, size, color, skew, shadow, list } => {
                assert_eq!(words, vec!["hello", "world"]);
                assert_eq!(font, "DejaVuSans-Bold");
                assert_eq!(size, 23.0);
                assert_eq!(color, "#0099ff");
                assert_eq!(skew, None);
                assert!(!shadow && !list);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["fabterm", "image", "a.png", "-w", "40", "-B", "white", "--debug"])
                .unwrap();
        assert_eq!(cli.term_color, "white");
        assert!(cli.debug);
        match cli.command {
            Command::Image { files, width } => {
                assert_eq!(files, vec![PathBuf::from("a.png")]);
                assert_eq!(width, Some(40));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_image_needs_a_file() {
        assert!(Cli::try_parse_from(["fabterm", "image"]).is_err());
    }

    #[test]
    fn test_list_fonts_needs_no_words() {
        assert!(Cli::try_parse_from(["fabterm", "text", "--list"]).is_ok());
        assert!(Cli::try_parse_from(["fabterm", "text"]).is_err());
    }

    #[test]
    fn test_print_art_writes_lines() {
        let config = RenderConfig { width: Some(2), ..RenderConfig::default() };
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
        let art = ImageArt::from_rgba(img, &config);
        let mut out = Vec::new();
        print_art(&mut out, &art, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\x1b[48;5;9m  \x1b[49m\n\n");

        let mut out = Vec::new();
        print_art(&mut out, &art, true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "<>\n\n");
    }
}
