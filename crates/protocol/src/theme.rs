use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved to CSS values by the page's theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    /// Navigation bar border while the page sits near the top.
    NavBorderResting,
    /// Navigation bar border once the page has scrolled past the threshold.
    NavBorderScrolled,
}

impl ThemeToken {
    pub fn css_value(self) -> &'static str {
        match self {
            // Defined by the site stylesheet.
            Self::NavBorderResting => "var(--color-border)",
            Self::NavBorderScrolled => "rgba(224, 224, 224, 0.8)",
        }
    }
}
