//! A whole page session without a browser.
//!
//! Stands in for the host: applies commands to a [`MemoryDocument`], polls
//! element visibility after every scroll in place of `IntersectionObserver`,
//! and dispatches clicks to the anchors that were intercepted.

use folio_protocol::NodeId;
use log::debug;

use crate::anchor::{self, ClickOutcome};
use crate::config::EnhanceConfig;
use crate::dom::{Document, ReadyState};
use crate::init::{Enhancer, Installation, StartMode};
use crate::memory::MemoryDocument;

#[derive(Debug)]
pub struct HeadlessSession {
    doc: MemoryDocument,
    enhancer: Enhancer,
    installation: Option<Installation>,
    waiting_for_ready: bool,
}

impl HeadlessSession {
    pub fn new(doc: MemoryDocument, config: EnhanceConfig) -> Self {
        Self {
            doc,
            enhancer: Enhancer::new(config),
            installation: None,
            waiting_for_ready: false,
        }
    }

    pub fn doc(&self) -> &MemoryDocument {
        &self.doc
    }

    pub fn installation(&self) -> Option<&Installation> {
        self.installation.as_ref()
    }

    pub fn is_enhanced(&self) -> bool {
        self.installation.is_some()
    }

    /// The script is evaluated: run now, or wait for `DOMContentLoaded`.
    pub fn load(&mut self) {
        match self.enhancer.start_mode(&self.doc) {
            StartMode::Immediate => self.start(),
            StartMode::OnDomContentLoaded => {
                debug!("session: document loading, deferring");
                self.waiting_for_ready = true;
            }
        }
    }

    pub fn dom_content_loaded(&mut self) {
        if self.doc.ready_state() == ReadyState::Loading {
            self.doc.set_ready_state(ReadyState::Interactive);
        }
        if std::mem::take(&mut self.waiting_for_ready) {
            self.start();
        }
    }

    fn start(&mut self) {
        let Some(installation) = self.enhancer.run(&self.doc) else {
            return;
        };
        self.doc.apply_all(&installation.commands);
        self.installation = Some(installation);
        // Observers report every target once when they start observing.
        self.poll_visibility();
    }

    fn poll_visibility(&mut self) {
        let Some(installation) = self.installation.as_mut() else {
            return;
        };
        for reveal in installation.reveals_mut() {
            let entries = self.doc.visibility(reveal.watched().collect::<Vec<_>>());
            let batch = reveal.on_visibility(&self.doc, &entries);
            self.doc.apply_all(&batch.commands);
        }
    }

    pub fn scroll_to(&mut self, y: f64) {
        self.doc.set_scroll_y(y);
        self.on_scroll();
    }

    fn on_scroll(&mut self) {
        self.poll_visibility();
        let commands = self
            .installation
            .as_ref()
            .and_then(|i| i.nav_scroll.as_ref())
            .map(|watcher| watcher.on_scroll(self.doc.scroll_offset()));
        if let Some(commands) = commands {
            self.doc.apply_all(&commands);
        }
    }

    /// Click an element. Only intercepted anchors have a handler.
    pub fn click(&mut self, node: NodeId) -> ClickOutcome {
        let intercepted = self
            .installation
            .as_ref()
            .is_some_and(|i| i.anchors.contains(&node));
        if !intercepted {
            return ClickOutcome::pass_through();
        }

        let href = self.doc.attribute(node, "href");
        let outcome = anchor::on_click(&self.doc, href.as_deref());
        let before = self.doc.scroll_offset();
        self.doc.apply_all(&outcome.commands);
        if self.doc.scroll_offset() != before {
            self.on_scroll();
        }
        outcome
    }

    /// Let `ms` of virtual time pass, firing due timers.
    pub fn advance(&mut self, ms: u64) {
        self.doc.advance(ms);
    }

    pub fn into_document(self) -> MemoryDocument {
        self.doc
    }
}
