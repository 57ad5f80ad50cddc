//! Output stream handling: the sink seam and whitespace normalization.

use std::io::{self, Write};

/// Where the planner emits rewritten commands, one textual command per
/// call. Implementations decide where the text goes; the planner only
/// guarantees emission order matches physical motion order.
pub trait GcodeSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Collapse repeated interior whitespace and trim both ends.
///
/// Applied to every emitted line, so passthrough output is identical to
/// the input modulo whitespace, and re-normalizing is a no-op.
pub fn normalize_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Format a coordinate or feed value with up to three decimals,
/// trimming trailing zeros.
pub fn format_axis(value: f64) -> String {
    trim_decimal(format!("{value:.3}"))
}

/// Format an extrusion amount with up to five decimals. Extrusion is
/// apportioned across split moves, so it keeps more precision than the
/// axis values.
pub fn format_extrusion(value: f64) -> String {
    trim_decimal(format!("{value:.5}"))
}

fn trim_decimal(mut s: String) -> String {
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Writes normalized, newline-terminated lines to any [`io::Write`].
pub struct StreamWriter<W: Write> {
    inner: W,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> GcodeSink for StreamWriter<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.inner, "{}", normalize_line(line))
    }
}
