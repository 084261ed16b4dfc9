use std::cell::RefCell;
use std::rc::Rc;

use folio_core::{Document, ReadyState};
use folio_protocol::{DomCommand, NodeId, ScrollBehavior, ScrollBlock, Selector};
use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, ScrollIntoViewOptions, ScrollLogicalPosition, Window};

/// [`Document`] over the live page.
///
/// Elements are interned on first sight; a `NodeId` is an index into that
/// arena and stays valid for the page's lifetime.
pub struct WebDocument {
    window: Window,
    document: web_sys::Document,
    nodes: RefCell<Vec<Element>>,
}

impl WebDocument {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Ok(Self {
            window,
            document,
            nodes: RefCell::new(Vec::new()),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn raw(&self) -> &web_sys::Document {
        &self.document
    }

    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.nodes.borrow().get(node.0 as usize).cloned()
    }

    /// Handle for `element`, issuing a new one if it has not been seen.
    pub fn node_of(&self, element: &Element) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let index = match nodes.iter().position(|n| n == element) {
            Some(index) => index,
            None => {
                nodes.push(element.clone());
                nodes.len() - 1
            }
        };
        NodeId(index as u32)
    }

    pub fn apply(self: &Rc<Self>, command: &DomCommand) {
        if let Err(err) = self.try_apply(command) {
            warn!("failed to apply {command:?}: {err:?}");
        }
    }

    fn try_apply(self: &Rc<Self>, command: &DomCommand) -> Result<(), JsValue> {
        match command {
            DomCommand::AddClass { node, class } => {
                if let Some(el) = self.element(*node) {
                    el.class_list().add_1(class)?;
                }
            }
            DomCommand::SetStyle {
                node,
                property,
                value,
            } => {
                let html = self
                    .element(*node)
                    .and_then(|e| e.dyn_into::<HtmlElement>().ok());
                if let Some(el) = html {
                    el.style().set_property(property.css_name(), value)?;
                }
            }
            DomCommand::ScrollIntoView {
                node,
                behavior,
                block,
            } => {
                if let Some(el) = self.element(*node) {
                    let options = ScrollIntoViewOptions::new();
                    options.set_behavior(scroll_behavior(*behavior));
                    options.set_block(scroll_block(*block));
                    el.scroll_into_view_with_scroll_into_view_options(&options);
                }
            }
            DomCommand::Defer { delay_ms, commands } => {
                let doc = Rc::clone(self);
                let commands = commands.clone();
                let callback = Closure::once_into_js(move || {
                    for command in &commands {
                        doc.apply(command);
                    }
                });
                self.window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(
                        callback.unchecked_ref(),
                        i32::try_from(*delay_ms).unwrap_or(i32::MAX),
                    )?;
            }
        }
        Ok(())
    }
}

impl Document for WebDocument {
    fn location_path(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::from_dom(&self.document.ready_state())
    }

    fn select(&self, selector: &Selector) -> Vec<NodeId> {
        let css = selector.to_css();
        let list = match self.document.query_selector_all(&css) {
            Ok(list) => list,
            Err(err) => {
                warn!("querySelectorAll({css}) failed: {err:?}");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| self.node_of(&el))
            .collect()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.document
            .get_element_by_id(id)
            .map(|el| self.node_of(&el))
    }

    fn scroll_offset(&self) -> f64 {
        self.window.page_y_offset().unwrap_or(0.0)
    }
}

fn scroll_behavior(behavior: ScrollBehavior) -> web_sys::ScrollBehavior {
    match behavior {
        ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
        ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
    }
}

fn scroll_block(block: ScrollBlock) -> ScrollLogicalPosition {
    match block {
        ScrollBlock::Start => ScrollLogicalPosition::Start,
        ScrollBlock::Center => ScrollLogicalPosition::Center,
        ScrollBlock::End => ScrollLogicalPosition::End,
        ScrollBlock::Nearest => ScrollLogicalPosition::Nearest,
    }
}
