//! In-memory document used by tests and by the headless replay tool.
//!
//! Deferred command batches run on a virtual clock: nothing happens until
//! [`MemoryDocument::advance`] moves time forward.

use std::collections::BTreeMap;

use folio_protocol::{
    DomCommand, NodeId, Rect, ScrollBehavior, ScrollBlock, Selector, StyleProperty, Viewport,
};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::dom::{Document, ReadyState};
use crate::reveal::VisibilityEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub style: BTreeMap<StyleProperty, String>,
    /// Layout box in page coordinates; elements without one are never visible.
    #[serde(default)]
    pub rect: Option<Rect>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            rect: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// A `scrollIntoView` call the document received.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollRecord {
    pub node: NodeId,
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

#[derive(Debug, Clone)]
struct Pending {
    due_ms: u64,
    seq: u64,
    commands: Vec<DomCommand>,
}

#[derive(Debug, Clone)]
pub struct MemoryDocument {
    path: String,
    ready_state: ReadyState,
    elements: Vec<Element>,
    viewport: Viewport,
    now_ms: u64,
    next_seq: u64,
    pending: Vec<Pending>,
    scrolls: Vec<ScrollRecord>,
}

impl MemoryDocument {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ready_state: ReadyState::Complete,
            elements: Vec::new(),
            viewport: Viewport::new(0.0, 1280.0, 800.0),
            now_ms: 0,
            next_seq: 0,
            pending: Vec::new(),
            scrolls: Vec::new(),
        }
    }

    pub fn with_ready_state(mut self, state: ReadyState) -> Self {
        self.ready_state = state;
        self
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport.width = width;
        self.viewport.height = height;
        self
    }

    /// Append an element in document order.
    pub fn push(&mut self, element: Element) -> NodeId {
        let id = NodeId(self.elements.len() as u32);
        self.elements.push(element);
        id
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.elements.get(node.0 as usize)
    }

    pub fn elements(&self) -> impl Iterator<Item = (NodeId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (NodeId(i as u32), e))
    }

    pub fn style(&self, node: NodeId, property: StyleProperty) -> Option<&str> {
        self.element(node)?.style.get(&property).map(String::as_str)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|e| e.has_class(class))
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_scroll_y(&mut self, y: f64) {
        self.viewport.scroll_y = y;
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn scrolls(&self) -> &[ScrollRecord] {
        &self.scrolls
    }

    /// Poll the visibility of `nodes` against the current viewport.
    pub fn visibility(&self, nodes: impl IntoIterator<Item = NodeId>) -> Vec<VisibilityEntry> {
        nodes
            .into_iter()
            .map(|node| {
                let ratio = self
                    .element(node)
                    .and_then(|e| e.rect)
                    .map_or(0.0, |r| r.intersection_ratio(&self.viewport));
                VisibilityEntry::from_ratio(node, ratio)
            })
            .collect()
    }

    pub fn apply_all(&mut self, commands: &[DomCommand]) {
        for command in commands {
            self.apply(command);
        }
    }

    /// Execute one command. Commands naming unknown nodes are dropped.
    pub fn apply(&mut self, command: &DomCommand) {
        match command {
            DomCommand::AddClass { node, class } => {
                if let Some(el) = self.elements.get_mut(node.0 as usize) {
                    if !el.has_class(class) {
                        el.classes.push(class.clone());
                    }
                } else {
                    debug!("memory: add_class on unknown node {node}");
                }
            }
            DomCommand::SetStyle {
                node,
                property,
                value,
            } => {
                if let Some(el) = self.elements.get_mut(node.0 as usize) {
                    el.style.insert(*property, value.clone());
                } else {
                    debug!("memory: set_style on unknown node {node}");
                }
            }
            DomCommand::ScrollIntoView {
                node,
                behavior,
                block,
            } => {
                let Some(el) = self.element(*node) else {
                    debug!("memory: scroll_into_view on unknown node {node}");
                    return;
                };
                if let Some(rect) = el.rect {
                    let vp = self.viewport;
                    let y = match block {
                        ScrollBlock::Start => rect.y,
                        ScrollBlock::End => rect.y + rect.h - vp.height,
                        ScrollBlock::Center => rect.y + rect.h / 2.0 - vp.height / 2.0,
                        ScrollBlock::Nearest => {
                            if rect.y < vp.scroll_y {
                                rect.y
                            } else if rect.y + rect.h > vp.scroll_y + vp.height {
                                rect.y + rect.h - vp.height
                            } else {
                                vp.scroll_y
                            }
                        }
                    };
                    self.viewport.scroll_y = y.max(0.0);
                }
                self.scrolls.push(ScrollRecord {
                    node: *node,
                    behavior: *behavior,
                    block: *block,
                });
            }
            DomCommand::Defer { delay_ms, commands } => {
                self.pending.push(Pending {
                    due_ms: self.now_ms.saturating_add(u64::from(*delay_ms)),
                    seq: self.next_seq,
                    commands: commands.clone(),
                });
                self.next_seq += 1;
            }
        }
    }

    /// Move the virtual clock forward, running every deferred batch that
    /// comes due, in due-time then scheduling order. The clock saturates at
    /// `u64::MAX`.
    pub fn advance(&mut self, ms: u64) {
        let target = self.now_ms.saturating_add(ms);
        loop {
            let next = self
                .pending
                .iter()
                .enumerate()
                .filter(|(_, p)| p.due_ms <= target)
                .min_by_key(|(_, p)| (p.due_ms, p.seq))
                .map(|(i, _)| i);
            let Some(index) = next else { break };
            let batch = self.pending.remove(index);
            self.now_ms = self.now_ms.max(batch.due_ms);
            self.apply_all(&batch.commands);
        }
        self.now_ms = target;
    }
}

impl Document for MemoryDocument {
    fn location_path(&self) -> String {
        self.path.clone()
    }

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn select(&self, selector: &Selector) -> Vec<NodeId> {
        self.elements()
            .filter(|(_, e)| {
                selector.matches(
                    &e.tag,
                    &e.classes,
                    e.attributes.get("href").map(String::as_str),
                )
            })
            .map(|(node, _)| node)
            .collect()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.attributes.get(name).cloned()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.elements()
            .find(|(_, e)| e.id.as_deref() == Some(id))
            .map(|(node, _)| node)
    }

    fn scroll_offset(&self) -> f64 {
        self.viewport.scroll_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_in_document_order() {
        let mut doc = MemoryDocument::new("/");
        let a = doc.push(Element::new("div").class("card"));
        doc.push(Element::new("div").class("other"));
        let c = doc.push(Element::new("div").class("card"));
        assert_eq!(doc.select(&Selector::Class("card".into())), vec![a, c]);
    }

    #[test]
    fn add_class_is_idempotent() {
        let mut doc = MemoryDocument::new("/");
        let a = doc.push(Element::new("a").class("nav-link"));
        let cmd = DomCommand::AddClass {
            node: a,
            class: "active".into(),
        };
        doc.apply(&cmd);
        doc.apply(&cmd);
        assert_eq!(doc.element(a).unwrap().classes, vec!["nav-link", "active"]);
    }

    #[test]
    fn deferred_batches_wait_for_the_clock() {
        let mut doc = MemoryDocument::new("/");
        let a = doc.push(Element::new("div"));
        doc.apply(&DomCommand::Defer {
            delay_ms: 100,
            commands: vec![DomCommand::set_style(a, StyleProperty::Width, "40%")],
        });
        doc.advance(99);
        assert_eq!(doc.style(a, StyleProperty::Width), None);
        assert_eq!(doc.pending_count(), 1);
        doc.advance(1);
        assert_eq!(doc.style(a, StyleProperty::Width), Some("40%"));
        assert_eq!(doc.pending_count(), 0);
        assert_eq!(doc.now_ms(), 100);
    }

    #[test]
    fn deferred_batches_run_in_due_order() {
        let mut doc = MemoryDocument::new("/");
        let a = doc.push(Element::new("div"));
        doc.apply(&DomCommand::Defer {
            delay_ms: 100,
            commands: vec![DomCommand::set_style(a, StyleProperty::Opacity, "late")],
        });
        doc.apply(&DomCommand::Defer {
            delay_ms: 50,
            commands: vec![DomCommand::set_style(a, StyleProperty::Opacity, "early")],
        });
        doc.advance(500);
        assert_eq!(doc.style(a, StyleProperty::Opacity), Some("late"));
    }

    #[test]
    fn clock_saturates_instead_of_overflowing() {
        let mut doc = MemoryDocument::new("/");
        let a = doc.push(Element::new("div"));
        doc.advance(1);
        doc.advance(u64::MAX);
        assert_eq!(doc.now_ms(), u64::MAX);

        doc.apply(&DomCommand::Defer {
            delay_ms: 100,
            commands: vec![DomCommand::set_style(a, StyleProperty::Width, "10%")],
        });
        doc.advance(5);
        assert_eq!(doc.now_ms(), u64::MAX);
        assert_eq!(doc.style(a, StyleProperty::Width), Some("10%"));
    }

    #[test]
    fn scroll_into_view_start_moves_viewport() {
        let mut doc = MemoryDocument::new("/");
        let section = doc.push(
            Element::new("section")
                .id("about")
                .rect(Rect::new(0.0, 1200.0, 800.0, 400.0)),
        );
        doc.apply(&DomCommand::ScrollIntoView {
            node: section,
            behavior: ScrollBehavior::Smooth,
            block: ScrollBlock::Start,
        });
        assert_eq!(doc.scroll_offset(), 1200.0);
        assert_eq!(doc.scrolls().len(), 1);
    }

    #[test]
    fn element_by_id_ignores_empty() {
        let mut doc = MemoryDocument::new("/");
        doc.push(Element::new("div").id(""));
        assert_eq!(doc.element_by_id(""), None);
    }

    #[test]
    fn visibility_without_rect_is_zero() {
        let mut doc = MemoryDocument::new("/");
        let a = doc.push(Element::new("div"));
        let b = doc.push(Element::new("div").rect(Rect::new(0.0, 0.0, 100.0, 100.0)));
        let entries = doc.visibility([a, b]);
        assert!(!entries[0].is_intersecting);
        assert_eq!(entries[1].ratio, 1.0);
    }

    #[test]
    fn unknown_nodes_are_dropped() {
        let mut doc = MemoryDocument::new("/");
        doc.apply(&DomCommand::set_style(NodeId(7), StyleProperty::Width, "1%"));
        assert_eq!(doc.elements().count(), 0);
    }
}
