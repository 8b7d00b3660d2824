//! Reshapes a completion's raw text into display lines.

/// Markdown emphasis marker removed from answers before display.
const EMPHASIS_MARKER: &str = "**";

/// Strips `**`, splits on `\n`, and drops lines that are empty after trimming.
/// Surviving lines keep their own whitespace (indentation matters for lists).
pub fn answer_lines(raw: &str) -> Vec<String> {
    raw.replace(EMPHASIS_MARKER, "")
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// How a single answer line should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `# Title`, `## Title`, ...
    Heading,
    /// `- item`, `* item`, `1. item`
    ListItem,
    Plain,
}

pub fn classify(line: &str) -> LineKind {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return LineKind::Heading;
    }
    if trimmed.starts_with("- ") || trimmed.starts_with("* ") {
        return LineKind::ListItem;
    }
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 && trimmed[digits..].starts_with(". ") {
        return LineKind::ListItem;
    }
    LineKind::Plain
}
