/// Header window sizes used by the position-sensitive detectors.
pub const VOLTAGE_HEADER_LINES: usize = 2;
pub const INSULATION_HEADER_LINES: usize = 3;
pub const MATERIAL_HEADER_LINES: usize = 4;
pub const HEADER_WINDOW_LINES: usize = 8;

/// Ordered, trimmed, non-empty lines taken from the top of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineWindow {
    lines: Vec<String>,
}

impl LineWindow {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// First `n` lines joined with single spaces and case-folded.
    pub fn joined_lowercase(&self, n: usize) -> String {
        self.lines()
            .iter()
            .take(n)
            .map(String::as_str)
            .collect::<Vec<&str>>()
            .join(" ")
            .to_lowercase()
    }
}

pub fn segment(text: &str, n: usize) -> LineWindow {
    LineWindow {
        lines: text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(n)
            .map(ToOwned::to_owned)
            .collect(),
    }
}
