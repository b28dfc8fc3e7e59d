//! Terminal highlighting for tracebacks echoed in debug mode.

use std::fmt::Write as FmtWrite;

use colored::Colorize;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;

const THEME: &str = "base16-ocean.dark";

/// Highlights traceback text for a 24-bit terminal.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Option<Theme>,
}

impl Highlighter {
    pub fn new() -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme = ThemeSet::load_defaults().themes.remove(THEME);
        Self { syntax_set, theme }
    }

    /// Render `text` with escapes. Lines that fail to highlight are dimmed
    /// instead; the output always holds every input line.
    pub fn render(&self, text: &str) -> String {
        let mut out = String::new();
        let syntax = self.syntax_set.find_syntax_by_token("rs");

        let (Some(syntax), Some(theme)) = (syntax, self.theme.as_ref()) else {
            for line in text.lines() {
                let _ = writeln!(out, "{}", line.dimmed());
            }
            return out;
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        for line in text.lines() {
            // The newline-aware syntax set expects lines with their terminator.
            let terminated = format!("{line}\n");
            match highlighter.highlight_line(&terminated, &self.syntax_set) {
                Ok(regions) => {
                    let escaped = as_24_bit_terminal_escaped(&regions, false);
                    let _ = write!(out, "{escaped}\x1b[0m");
                }
                Err(_) => {
                    let _ = writeln!(out, "{}", line.dimmed());
                }
            }
        }
        out
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter").field("theme", &THEME).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_every_line() {
        let highlighter = Highlighter::new();
        let out = highlighter.render("Error: boom\nstack backtrace:\n   0: app::main");
        assert!(out.contains("boom"));
        assert!(out.contains("app"));
        assert_eq!(out.matches('\n').count(), 3);
    }
}
