//! Text formatting for dashboard labels.

use chrono::Duration;

/// Integer formatting with locale-dependent thousands grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    grouping_separator: char,
}

impl NumberFormat {
    /// Format with an explicit grouping separator.
    pub fn with_separator(grouping_separator: char) -> Self {
        Self { grouping_separator }
    }

    /// Pick the grouping separator for a locale tag such as `"de"` or `"fr-CA"`.
    pub fn for_locale(locale: &str) -> Self {
        let tag = locale.trim().to_lowercase().replace('_', "-");
        let mut parts = tag.split('-');
        let language = parts.next().unwrap_or("");
        let swiss = parts.any(|region| region == "ch");

        let separator = match language {
            "de" | "fr" | "it" | "rm" if swiss => '\'',
            "de" | "es" | "it" | "nl" | "pt" | "da" | "id" => '.',
            "fr" => '\u{202f}',
            _ => ',',
        };
        Self::with_separator(separator)
    }

    /// Separator placed between groups of three digits.
    pub fn grouping_separator(&self) -> char {
        self.grouping_separator
    }

    /// Format an integer with grouping, keeping the sign.
    pub fn format(&self, value: i64) -> String {
        let digits = value.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if value < 0 {
            out.push('-');
        }
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(self.grouping_separator);
            }
            out.push(c);
        }
        out
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::with_separator(',')
    }
}

/// Format a duration as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    format!("{:02}:{:02}", total / 60, total % 60)
}
