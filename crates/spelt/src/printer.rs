#![allow(missing_docs)]

use crate::test_case::Location;
use std::io;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Screen width the compact status lines are padded to.
pub const DEFAULT_SCREEN_WIDTH: usize = 50;

/// Width of the trailing tag field: the tag left-justified in 4 columns
/// plus the closing bracket.
const TAG_WIDTH: usize = 4;

/// Block separator: exactly 70 `=` characters.
const SEPARATOR: &str =
    "======================================================================";

/// Writes the engine's textual report to a [`WriteColor`] sink.
///
/// All output goes through this type; the engine decides *whether* a piece
/// of output is printed, the printer decides how it looks. Print errors
/// are ignored by the callers, so a broken pipe degrades to silence
/// instead of aborting the run.
pub struct Printer<W> {
    writer: W,
    screen_width: usize,
}

impl Printer<StandardStream> {
    /// A printer writing to the standard output stream.
    pub fn stdout() -> Self {
        Self::new(StandardStream::stdout(ColorChoice::Auto))
    }
}

impl<W: WriteColor> Printer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            screen_width: DEFAULT_SCREEN_WIDTH,
        }
    }

    pub fn set_screen_width(&mut self, width: usize) {
        self.screen_width = width;
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// The compact fixed-width line, with the tag colored when the sink
    /// supports it. The uncolored bytes are exactly what
    /// [`render_line`] produces.
    pub(crate) fn status_line(&mut self, count: usize, name: &str, tag: &str) -> io::Result<()> {
        let mut head = format!("[Case {}: {}", count, name);
        fit_width(&mut head, self.screen_width);
        write!(self.writer, "{}", head)?;

        let color = match tag {
            "OK" => Some(Color::Green),
            "FAIL" => Some(Color::Red),
            _ => None,
        };
        if let Some(color) = color {
            self.writer
                .set_color(ColorSpec::new().set_fg(Some(color)))?;
        }
        write!(self.writer, "{:<width$}", tag, width = TAG_WIDTH)?;
        if color.is_some() {
            self.writer.reset()?;
        }
        writeln!(self.writer, "]")
    }

    /// A captured-stream block, labeled `STDOUT` or `STDERR`.
    pub(crate) fn stream_block(&mut self, label: &str, name: &str, text: &str) -> io::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", SEPARATOR)?;
        writeln!(self.writer, "{} {}", label, name)?;
        writeln!(self.writer, "{}", SEPARATOR)?;
        writeln!(self.writer, "{}", text)
    }

    pub(crate) fn error_block(&mut self, count: usize, name: &str, desc: &str) -> io::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", SEPARATOR)?;
        writeln!(self.writer, "Uncaught error in Case {}: {}", count, name)?;
        writeln!(self.writer, "{}", desc)
    }

    pub(crate) fn failure_block(
        &mut self,
        count: usize,
        name: &str,
        location: Option<Location>,
        desc: &str,
    ) -> io::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", SEPARATOR)?;
        match location {
            Some(loc) => writeln!(
                self.writer,
                "Failure in case {}: {} at {}: {}",
                count, name, loc.file, loc.line
            )?,
            None => writeln!(self.writer, "Failure in case {}: {}", count, name)?,
        }
        writeln!(self.writer, "{}", desc)
    }

    pub(crate) fn failed_cases(&mut self, names: &[String]) -> io::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", SEPARATOR)?;
        write!(self.writer, "Failed cases: ")?;
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                write!(self.writer, ", ")?;
            }
            write!(self.writer, "{}", name)?;
        }
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", SEPARATOR)
    }

    pub(crate) fn verdict(&mut self, passed: bool) -> io::Result<()> {
        write!(self.writer, "Unit Test ")?;
        let (text, color) = if passed {
            ("Passed", Color::Green)
        } else {
            ("FAILED", Color::Red)
        };
        self.writer.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(self.writer, "{}", text)?;
        self.writer.reset()?;
        writeln!(self.writer)
    }
}

/// Build the compact fixed-width status line.
///
/// `"[Case {count}: {name}"` is padded with spaces to `screen_width` and
/// truncated to it, then the tag follows left-justified in 4 columns plus
/// a closing bracket, so every line is `screen_width + 5` columns wide
/// regardless of the name length.
pub fn render_line(screen_width: usize, count: usize, name: &str, tag: &str) -> String {
    let mut line = format!("[Case {}: {}", count, name);
    fit_width(&mut line, screen_width);
    line.push_str(&format!("{:<width$}", tag, width = TAG_WIDTH));
    line.push(']');
    line
}

/// Pad or truncate to exactly `width` characters. Truncation happens on a
/// character boundary, so multi-byte names cannot split a code point.
fn fit_width(line: &mut String, width: usize) {
    match line.char_indices().nth(width) {
        Some((idx, _)) => line.truncate(idx),
        None => {
            let padding = width - line.chars().count();
            line.extend(std::iter::repeat(' ').take(padding));
        }
    }
}
