use folio_protocol::{NodeId, Selector};
use serde::{Deserialize, Serialize};

/// `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    /// Map `document.readyState`. Anything unrecognized counts as loaded.
    pub fn from_dom(state: &str) -> Self {
        match state {
            "loading" => Self::Loading,
            "interactive" => Self::Interactive,
            _ => Self::Complete,
        }
    }
}

/// Read-only view of the host page.
///
/// Mutations never go through this trait: components return
/// [`folio_protocol::DomCommand`]s and the host applies them.
pub trait Document {
    /// `location.pathname`.
    fn location_path(&self) -> String;

    fn ready_state(&self) -> ReadyState;

    /// All elements matching `selector`, in document order.
    fn select(&self, selector: &Selector) -> Vec<NodeId>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Current vertical page offset (`window.pageYOffset`).
    fn scroll_offset(&self) -> f64;
}
