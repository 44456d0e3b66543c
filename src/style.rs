//! Terminal styling utilities
//!
//! One color scheme for every line the run prints.
//! Uses crossterm for cross-platform terminal colors.

use crossterm::style::{StyledContent, Stylize};

/// Success mark for a finished step
pub fn ok_mark() -> StyledContent<&'static str> {
    "✓".green()
}

/// Failure mark for a finished step
pub fn fail_mark() -> StyledContent<&'static str> {
    "✗".red()
}

/// Section headers
pub fn header(text: &str) -> StyledContent<String> {
    text.to_string().bold()
}

/// Dim/muted text
pub fn dim(text: &str) -> StyledContent<String> {
    text.to_string().dark_grey()
}

/// Warning text
pub fn warning(text: &str) -> StyledContent<String> {
    text.to_string().yellow()
}

/// Error text
pub fn error(text: &str) -> StyledContent<String> {
    text.to_string().red()
}

/// Branch names
pub fn branch(name: &str) -> StyledContent<String> {
    name.to_string().cyan()
}

/// Path styling
pub fn path(p: &str) -> StyledContent<String> {
    p.to_string().blue()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks() {
        assert_eq!(*ok_mark().content(), "✓");
        assert_eq!(*fail_mark().content(), "✗");
    }

    #[test]
    fn test_text_styles_keep_content() {
        assert_eq!(branch("feature/x").content(), "feature/x");
        assert_eq!(path("/srv/work").content(), "/srv/work");
        let _ = header("Summary");
        let _ = dim("muted");
        let _ = warning("careful");
        let _ = error("bad");
    }
}
