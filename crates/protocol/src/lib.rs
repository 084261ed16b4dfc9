pub mod commands;
pub mod selector;
pub mod theme;
pub mod types;

pub use commands::{DomCommand, ScrollBehavior, ScrollBlock, StyleProperty};
pub use selector::Selector;
pub use theme::ThemeToken;
pub use types::{NodeId, Rect, Viewport};
