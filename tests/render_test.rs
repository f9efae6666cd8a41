use std::collections::BTreeMap;

use fabterm::children;
use fabterm::style::{
    bg, blue, blue_bg, bold, complement, fg, flip, green, italic, plain, red, red_bg, strike,
    underline, yellow, Child, Group, StyleCode, StyleNode,
};
use fabterm::{ImageArt, RenderConfig, Rgb};
use image::{Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use test_case::test_case;
use vte::{Params, Parser, Perform};

type State = BTreeMap<Group, StyleCode>;

/// Just enough of a terminal to track SGR state for every printed char.
#[derive(Default)]
struct Screen {
    state: State,
    cells: Vec<(char, State)>,
}

impl Screen {
    fn feed(text: &str) -> Self {
        let mut screen = Screen::default();
        let mut parser = Parser::new();
        for byte in text.bytes() {
            parser.advance(&mut screen, byte);
        }
        screen
    }

    fn apply(&mut self, n: u16, rest: &mut impl Iterator<Item = u16>) {
        match n {
            38 | 48 => {
                assert_eq!(rest.next(), Some(5), "only 256-color extended codes are used");
                let id = rest.next().expect("color index") as u8;
                let code = if n == 38 { StyleCode::fg256(id) } else { StyleCode::bg256(id) };
                self.state.insert(code.group(), code);
            }
            _ => {
                let code = StyleCode::from_sgr(n).expect("known SGR code");
                if code == StyleCode::RESET {
                    self.state.clear();
                } else if code == code.group().off() {
                    self.state.remove(&code.group());
                } else {
                    self.state.insert(code.group(), code);
                }
            }
        }
    }
}

impl Perform for Screen {
    fn print(&mut self, c: char) {
        self.cells.push((c, self.state.clone()));
    }

    fn csi_dispatch(&mut self, params: &Params, _intermediates: &[u8], _ignore: bool, action: char) {
        assert_eq!(action, 'm', "only SGR sequences are expected");
        let codes: Vec<u16> = params.iter().flat_map(|p| p.iter().copied()).collect();
        if codes.is_empty() {
            self.state.clear();
        }
        let mut codes = codes.into_iter();
        while let Some(n) = codes.next() {
            self.apply(n, &mut codes);
        }
    }
}

/// What every char should look like: its ancestors' codes, innermost last.
fn expected(node: &StyleNode, inherited: &State, out: &mut Vec<(char, State)>) {
    let mut state = inherited.clone();
    for code in node.codes() {
        state.insert(code.group(), code);
    }
    for child in node.children() {
        match child {
            Child::Text(text) => out.extend(text.chars().map(|c| (c, state.clone()))),
            Child::Node(node) => expected(node, &state, out),
        }
    }
}

#[test_case(bold(children![blue(children!["before ", green(["hi"]), " after"])]) ; "nested colors")]
#[test_case(plain(children!["a", red(["b"]), "c", bg((0, 0, 255), ["d"])]) ; "plain root")]
#[test_case(red(children!["x", bg((255, 0, 0), children!["y", fg((0, 255, 0), ["z"])]), "w"]) ; "foreground and background")]
#[test_case(underline(children![bold(["a"]), italic(children![strike(["b"]), "c"]), "d"]) ; "toggles")]
#[test_case(plain([", "]).join([green(["one"]), red(["two"])]) ; "join")]
#[test_case(complement((255, 0, 0), children!["hi ", underline(["there"])]) ; "complement")]
#[test_case(flip(children![red_bg(["a"]), blue_bg(children![yellow(["b"])]), "c"]) ; "backgrounds under inverse")]
#[test_case(red(children![red(["same"]), " ", bold(children![red(["again"])])]) ; "redundant codes")]
fn test_terminal_sees_every_nested_style(node: StyleNode) {
    let rendered = node.to_string();
    let screen = Screen::feed(&rendered);

    let mut want = Vec::new();
    expected(&node, &State::new(), &mut want);
    assert_eq!(screen.cells, want, "rendered as {rendered:?}");
    assert!(screen.state.is_empty(), "style leaked past the end of {rendered:?}");
}

#[test]
fn test_stripped_output_is_the_plain_text() {
    let node = bold(children!["日本 ", red(children!["is ", underline(["wide"])])]);
    let rendered = node.to_string();
    assert_eq!(strip_ansi_escapes::strip_str(&rendered), "日本 is wide");
    assert_eq!(node.width(), 12);
}

#[test]
fn test_image_rows_never_leak_background() {
    let mut img = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0]));
    for x in 0..6 {
        img.put_pixel(x, 2, Rgba([255, 0, 0, 255]));
        img.put_pixel(x, 3, Rgba([255, 0, 0, 255]));
        img.put_pixel(x, 4, Rgba([0, 255, 0, 128]));
        img.put_pixel(x, 5, Rgba([0, 255, 0, 128]));
    }
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("art.png");
    img.save(&path).unwrap();

    let config = RenderConfig {
        width: Some(8),
        term_bg: Rgb::new(255, 255, 255),
        ..RenderConfig::default()
    };
    let art = ImageArt::open(&path, &config).unwrap();
    assert_eq!(art.size(), (8, 4));

    let lines: Vec<String> = art.lines().collect();
    assert_eq!(lines.last().map(String::as_str), Some(""));
    // rows 0 and 3 are fully transparent and dropped
    assert_eq!(lines.len(), 3);

    for line in &lines[..2] {
        let screen = Screen::feed(line);
        assert!(screen.state.is_empty(), "{line:?}");
        assert_eq!(screen.cells.len(), 6);
        assert!(screen.cells.iter().all(|(c, s)| *c == ' ' && s.contains_key(&Group::Background)));
        assert_eq!(strip_ansi_escapes::strip_str(line), " ".repeat(6));
    }
    // translucent green over white is (127, 255, 127)
    assert!(lines[1].contains("\x1b[48;5;120m"), "{:?}", lines[1]);
}
