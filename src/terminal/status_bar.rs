//! One-line status shown under the preview.

/// What the status line reports about the running session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    pub changed_pixels: usize,
    pub alarm: bool,
    pub reference: String,
    pub reference_index: usize,
    pub reference_count: usize,
}

impl StatusLine {
    /// Format: ` cam:on | ref 1/1 graphic1.jpg | changed 1234 | ALARM | q quit  c camera `
    pub fn format(&self) -> String {
        format!(
            " cam:on | ref {}/{} {} | changed {} | {} | q quit  c camera ",
            self.reference_index + 1,
            self.reference_count,
            self.reference,
            self.changed_pixels,
            if self.alarm { "ALARM" } else { "quiet" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_quiet() {
        let status = StatusLine {
            changed_pixels: 12,
            alarm: false,
            reference: "graphic1.jpg".to_string(),
            reference_index: 0,
            reference_count: 1,
        };
        assert_eq!(
            status.format(),
            " cam:on | ref 1/1 graphic1.jpg | changed 12 | quiet | q quit  c camera "
        );
    }

    #[test]
    fn test_format_alarm() {
        let status = StatusLine {
            alarm: true,
            reference_count: 2,
            reference_index: 1,
            ..Default::default()
        };
        assert!(status.format().contains("ALARM"));
        assert!(status.format().contains("ref 2/2"));
    }
}
