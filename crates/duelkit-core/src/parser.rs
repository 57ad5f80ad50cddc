//! G-code line lexing.
//!
//! The lexer is deliberately lenient: any line it cannot fully read is
//! still carried through as raw text, since unrecognized lines pass
//! through the rewriter untouched. Strict interpretation happens later,
//! in [`Command::classify`](crate::command::Command::classify), and only
//! for the line kinds the planner acts on.

use std::sync::OnceLock;

use regex::Regex;

/// One lexed word: a letter and its numeric value, if one was present.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub letter: char,
    pub value: Option<f64>,
}

/// One parsed line of G-code.
///
/// `raw` keeps the original text so passthrough lines can be re-emitted
/// verbatim (modulo whitespace normalization).
#[derive(Debug, Clone, PartialEq)]
pub struct GcodeLine {
    /// Original line text, without the trailing newline.
    pub raw: String,
    /// The command word (first letter/number pair), if present.
    pub command: Option<(char, f64)>,
    /// All lexed words, command word included.
    pub words: Vec<Word>,
    /// Comment text following the first `;` or `(`, if any.
    pub comment: Option<String>,
    /// 1-based input line number.
    pub line_number: u32,
}

impl GcodeLine {
    /// Looks up a parameter word (any word after the command word).
    pub fn word(&self, letter: char) -> Option<&Word> {
        self.words.iter().skip(1).find(|w| w.letter == letter)
    }

    /// Numeric value of a parameter word, if present and readable.
    pub fn param(&self, letter: char) -> Option<f64> {
        self.word(letter).and_then(|w| w.value)
    }

    /// The command word exactly as written (e.g. `G1`, `G01`), if any.
    pub fn command_token(&self) -> Option<&str> {
        let code = match self.raw.find([';', '(']) {
            Some(pos) => &self.raw[..pos],
            None => &self.raw,
        };
        code.split_whitespace().next()
    }
}

fn word_regex() -> &'static Regex {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    WORD_REGEX.get_or_init(|| {
        Regex::new(r"([A-Za-z])\s*([-+]?[0-9]*\.?[0-9]+)?").expect("invalid regex pattern")
    })
}

/// Streaming line parser with 1-based line numbering.
pub struct GcodeParser {
    next_line: u32,
}

impl GcodeParser {
    /// Create a new parser starting at line 1.
    pub fn new() -> Self {
        Self { next_line: 1 }
    }

    /// Lex one raw line into a [`GcodeLine`].
    pub fn parse_line(&mut self, raw: &str) -> GcodeLine {
        let line_number = self.next_line;
        self.next_line += 1;

        let raw = raw.trim_end_matches(['\r', '\n']);
        let (code, comment) = match raw.find([';', '(']) {
            Some(pos) => (&raw[..pos], Some(raw[pos + 1..].to_string())),
            None => (raw, None),
        };

        let mut words = Vec::new();
        for caps in word_regex().captures_iter(code) {
            let letter = caps
                .get(1)
                .and_then(|m| m.as_str().chars().next())
                .map(|c| c.to_ascii_uppercase());
            let Some(letter) = letter else { continue };
            let value = caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok());
            words.push(Word { letter, value });
        }

        let command = words
            .first()
            .and_then(|w| w.value.map(|v| (w.letter, v)));

        GcodeLine {
            raw: raw.to_string(),
            command,
            words,
            comment,
            line_number,
        }
    }

    /// Lex a whole document.
    pub fn parse_all(input: &str) -> Vec<GcodeLine> {
        let mut parser = Self::new();
        input.lines().map(|l| parser.parse_line(l)).collect()
    }
}

impl Default for GcodeParser {
    fn default() -> Self {
        Self::new()
    }
}
