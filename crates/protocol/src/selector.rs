use serde::{Deserialize, Serialize};

/// The small set of element queries the enhancements need.
///
/// Kept structural so in-memory documents can match without a CSS engine;
/// browser hosts use [`Selector::to_css`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// Elements carrying a class.
    Class(String),
    /// Elements carrying at least one of the classes.
    AnyClass(Vec<String>),
    /// Anchor elements whose `href` starts with the prefix.
    HrefPrefix(String),
}

impl Selector {
    /// Class names are escaped with `CSS.escape` rules, so any name the
    /// in-memory matcher accepts selects the same elements in a browser.
    pub fn to_css(&self) -> String {
        match self {
            Self::Class(class) => format!(".{}", escape_ident(class)),
            Self::AnyClass(classes) => classes
                .iter()
                .map(|c| format!(".{}", escape_ident(c)))
                .collect::<Vec<_>>()
                .join(", "),
            Self::HrefPrefix(prefix) => {
                format!("a[href^=\"{}\"]", prefix.replace('\\', "\\\\").replace('"', "\\\""))
            }
        }
    }

    /// Whether an element with the given tag, classes and `href` matches.
    pub fn matches(&self, tag: &str, classes: &[String], href: Option<&str>) -> bool {
        match self {
            Self::Class(class) => classes.iter().any(|c| c == class),
            Self::AnyClass(wanted) => classes.iter().any(|c| wanted.contains(c)),
            Self::HrefPrefix(prefix) => {
                tag.eq_ignore_ascii_case("a")
                    && href.is_some_and(|h| h.starts_with(prefix.as_str()))
            }
        }
    }
}

/// Serialize `ident` as a CSS identifier (the `CSS.escape()` algorithm).
pub fn escape_ident(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let chars: Vec<char> = ident.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        let leading_digit = c.is_ascii_digit() && (i == 0 || (i == 1 && chars[0] == '-'));
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => out.push_str(&format!("\\{:x} ", c as u32)),
            _ if leading_digit => out.push_str(&format!("\\{:x} ", c as u32)),
            '-' if i == 0 && chars.len() == 1 => out.push_str("\\-"),
            c if c >= '\u{80}' || c == '-' || c == '_' || c.is_ascii_alphanumeric() => {
                out.push(c);
            }
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}
