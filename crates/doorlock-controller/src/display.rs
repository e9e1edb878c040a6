//! Virtual character LCD.
//!
//! A fixed-size text buffer standing in for the 16x2 HD44780-style panel.
//! Lines are sanitized to printable ASCII, truncated to the column width and
//! padded, so what the buffer holds is exactly what the glass would show.
//!
//! # Examples
//!
//! ```
//! use doorlock_controller::VirtualDisplay;
//! use doorlock_hardware::DisplaySink;
//!
//! let mut display = VirtualDisplay::lcd_16x2();
//! display.show_status("Enter Password:", "****").unwrap();
//!
//! assert_eq!(display.line(0).map(str::trim_end), Some("Enter Password:"));
//! assert_eq!(display.line(1).map(str::trim_end), Some("****"));
//! ```

use doorlock_core::constants::{DISPLAY_COLUMNS, DISPLAY_LINES};
use doorlock_hardware::{DisplaySink, Result};

/// In-memory character display.
#[derive(Debug, Clone)]
pub struct VirtualDisplay {
    columns: usize,
    buffer: Vec<String>,
}

impl VirtualDisplay {
    fn new(lines: usize, columns: usize) -> Self {
        Self {
            columns,
            buffer: vec![" ".repeat(columns); lines],
        }
    }

    pub fn lcd_16x2() -> Self {
        Self::new(DISPLAY_LINES, DISPLAY_COLUMNS)
    }

    /// Write one line, left aligned. Out-of-range lines are ignored.
    ///
    /// Returns `true` if the visible content changed.
    pub fn set_line(&mut self, line: usize, text: &str) -> bool {
        let rendered = pad_text(&sanitize_text(text), self.columns);
        match self.buffer.get_mut(line) {
            Some(slot) if *slot != rendered => {
                *slot = rendered;
                true
            }
            _ => false,
        }
    }

    /// Replace the first two lines, returning `true` if anything changed.
    pub fn write_status(&mut self, line1: &str, line2: &str) -> bool {
        let first = self.set_line(0, line1);
        let second = self.set_line(1, line2);
        first || second
    }

    /// A line exactly `columns` characters wide.
    pub fn line(&self, line: usize) -> Option<&str> {
        self.buffer.get(line).map(String::as_str)
    }

    /// Framed rendering for terminals.
    pub fn render(&self) -> String {
        let border = format!("+{}+", "-".repeat(self.columns));
        let mut out = String::with_capacity((self.columns + 3) * (self.buffer.len() + 2));
        out.push_str(&border);
        for line in &self.buffer {
            out.push('\n');
            out.push('|');
            out.push_str(line);
            out.push('|');
        }
        out.push('\n');
        out.push_str(&border);
        out
    }
}

impl Default for VirtualDisplay {
    fn default() -> Self {
        Self::lcd_16x2()
    }
}

impl DisplaySink for VirtualDisplay {
    fn show_status(&mut self, line1: &str, line2: &str) -> Result<()> {
        self.write_status(line1, line2);
        Ok(())
    }
}

/// Truncate or right-pad with spaces to exactly `width` characters.
fn pad_text(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

/// Drop control characters; the panel has no glyphs beyond printable ASCII.
fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control())
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect::<String>()
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_display_is_blank() {
        let display = VirtualDisplay::lcd_16x2();

        assert_eq!(display.line(0), Some(" ".repeat(16).as_str()));
        assert_eq!(display.line(1), Some(" ".repeat(16).as_str()));
        assert_eq!(display.line(2), None);
    }

    #[test]
    fn test_show_status_overwrites_both_lines() {
        let mut display = VirtualDisplay::lcd_16x2();

        display.show_status("Door Open", "Closing in 9s").unwrap();
        display.show_status("Enter Password:", "").unwrap();

        assert_eq!(display.line(0).unwrap().trim_end(), "Enter Password:");
        assert_eq!(display.line(1).unwrap().trim_end(), "");
    }

    #[test]
    fn test_long_text_truncated_to_width() {
        let mut display = VirtualDisplay::lcd_16x2();

        display.set_line(0, "This line is far too long");
        assert_eq!(display.line(0), Some("This line is far"));
    }

    #[test]
    fn test_repeated_write_is_not_a_change() {
        let mut display = VirtualDisplay::lcd_16x2();

        assert!(display.write_status("LOCKED OUT!", "Wait 29s"));
        assert!(!display.write_status("LOCKED OUT!", "Wait 29s"));
        assert!(display.write_status("LOCKED OUT!", "Wait 28s"));
    }

    #[test]
    fn test_out_of_range_line_ignored() {
        let mut display = VirtualDisplay::lcd_16x2();
        assert!(!display.set_line(5, "nowhere"));
        assert_eq!(display.line(5), None);
    }

    #[rstest]
    #[case("Tab\there", "Tabhere")]
    #[case("Café", "Caf?")]
    #[case("trailing   ", "trailing")]
    fn test_sanitize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_text(input), expected);
    }

    #[test]
    fn test_render_frames_content() {
        let mut display = VirtualDisplay::new(2, 4);
        display.write_status("ab", "cd");

        assert_eq!(display.render(), "+----+\n|ab  |\n|cd  |\n+----+");
    }

    #[rstest]
    #[case("OPEN", 8, "OPEN    ")]
    #[case("OPEN", 4, "OPEN")]
    #[case("OPENED", 4, "OPEN")]
    #[case("", 3, "   ")]
    fn test_pad_text(#[case] input: &str, #[case] width: usize, #[case] expected: &str) {
        assert_eq!(pad_text(input, width), expected);
    }

    #[test]
    fn test_blank_status_erases_previous_text() {
        let mut display = VirtualDisplay::lcd_16x2();
        display.write_status("System Ready!", "x");
        assert!(display.write_status("", ""));
        assert_eq!(display.line(0).map(str::trim), Some(""));
        assert_eq!(display.line(1).map(str::trim), Some(""));
    }
}
