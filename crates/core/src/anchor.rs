use folio_protocol::{DomCommand, NodeId, ScrollBehavior, ScrollBlock, Selector};
use log::debug;

use crate::dom::Document;

/// Prefix identifying in-page links.
pub const FRAGMENT_PREFIX: &str = "#";

/// What a click handler decided.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickOutcome {
    /// Call `preventDefault()` on the click event.
    pub prevent_default: bool,
    pub commands: Vec<DomCommand>,
}

impl ClickOutcome {
    /// Let the browser handle the click.
    pub fn pass_through() -> Self {
        Self::default()
    }
}

/// Anchors whose clicks should be intercepted.
pub fn anchors<D: Document + ?Sized>(doc: &D) -> Vec<NodeId> {
    let anchors = doc.select(&Selector::HrefPrefix(FRAGMENT_PREFIX.into()));
    debug!("anchor: intercepting {} in-page link(s)", anchors.len());
    anchors
}

/// Handle a click on an intercepted anchor. `href` is read at click time.
///
/// A bare `#` and anything that is no longer a fragment pass through. Other
/// fragments suppress navigation and smooth-scroll to the element with that
/// id, if there is one.
pub fn on_click<D: Document + ?Sized>(doc: &D, href: Option<&str>) -> ClickOutcome {
    let Some(fragment) = href.and_then(|h| h.strip_prefix(FRAGMENT_PREFIX)) else {
        return ClickOutcome::pass_through();
    };
    if fragment.is_empty() {
        return ClickOutcome::pass_through();
    }

    let mut outcome = ClickOutcome {
        prevent_default: true,
        commands: Vec::new(),
    };
    match doc.element_by_id(fragment) {
        Some(node) => outcome.commands.push(DomCommand::ScrollIntoView {
            node,
            behavior: ScrollBehavior::Smooth,
            block: ScrollBlock::Start,
        }),
        None => debug!("anchor: no element with id {fragment:?}"),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Element, MemoryDocument};

    fn page() -> (MemoryDocument, NodeId) {
        let mut doc = MemoryDocument::new("/");
        doc.push(Element::new("a").attr("href", "#"));
        doc.push(Element::new("a").attr("href", "#section1"));
        doc.push(Element::new("a").attr("href", "about.html"));
        let section = doc.push(Element::new("section").id("section1"));
        (doc, section)
    }

    #[test]
    fn collects_fragment_anchors_only() {
        let (doc, _) = page();
        assert_eq!(anchors(&doc), vec![NodeId(0), NodeId(1)]);
    }

    #[test]
    fn bare_hash_does_nothing() {
        let (doc, _) = page();
        assert_eq!(on_click(&doc, Some("#")), ClickOutcome::pass_through());
    }

    #[test]
    fn existing_target_scrolls_smoothly_to_start() {
        let (doc, section) = page();
        let outcome = on_click(&doc, Some("#section1"));
        assert!(outcome.prevent_default);
        assert_eq!(
            outcome.commands,
            vec![DomCommand::ScrollIntoView {
                node: section,
                behavior: ScrollBehavior::Smooth,
                block: ScrollBlock::Start,
            }]
        );
    }

    #[test]
    fn missing_target_suppresses_without_scrolling() {
        let (doc, _) = page();
        let outcome = on_click(&doc, Some("#missing"));
        assert!(outcome.prevent_default);
        assert!(outcome.commands.is_empty());
    }

    #[test]
    fn malformed_fragment_is_a_plain_lookup() {
        let (doc, _) = page();
        let outcome = on_click(&doc, Some("#1 > .bad["));
        assert!(outcome.prevent_default);
        assert!(outcome.commands.is_empty());
    }

    #[test]
    fn rewritten_or_missing_href_passes_through() {
        let (doc, _) = page();
        assert_eq!(on_click(&doc, Some("about.html")), ClickOutcome::pass_through());
        assert_eq!(on_click(&doc, None), ClickOutcome::pass_through());
    }
}
