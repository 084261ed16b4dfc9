use folio_protocol::{DomCommand, NodeId, Selector};
use log::debug;

use crate::anchor;
use crate::config::EnhanceConfig;
use crate::dom::{Document, ReadyState};
use crate::nav;
use crate::reveal::Reveal;
use crate::scroll::NavScroll;

/// When the host should call [`Enhancer::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    Immediate,
    /// Wait for `DOMContentLoaded`.
    OnDomContentLoaded,
}

impl StartMode {
    pub fn for_state(state: ReadyState) -> Self {
        match state {
            ReadyState::Loading => Self::OnDomContentLoaded,
            ReadyState::Interactive | ReadyState::Complete => Self::Immediate,
        }
    }
}

/// Everything the host needs to wire up after a run.
#[derive(Debug)]
pub struct Installation {
    /// One-off writes to apply right away (active nav links).
    pub commands: Vec<DomCommand>,
    pub skill_bars: Option<Reveal>,
    /// Anchors that need a click listener.
    pub anchors: Vec<NodeId>,
    pub fade_ins: Option<Reveal>,
    pub nav_scroll: Option<NavScroll>,
}

impl Installation {
    pub fn reveals_mut(&mut self) -> impl Iterator<Item = &mut Reveal> {
        self.skill_bars.iter_mut().chain(self.fade_ins.iter_mut())
    }
}

/// Runs every enhancement once per page.
#[derive(Debug, Clone)]
pub struct Enhancer {
    config: EnhanceConfig,
    ran: bool,
}

impl Enhancer {
    pub fn new(config: EnhanceConfig) -> Self {
        Self { config, ran: false }
    }

    pub fn start_mode<D: Document + ?Sized>(&self, doc: &D) -> StartMode {
        StartMode::for_state(doc.ready_state())
    }

    /// Install every enhancement. Returns `None` on every call after the first.
    pub fn run<D: Document + ?Sized>(&mut self, doc: &D) -> Option<Installation> {
        if self.ran {
            debug!("init: already ran, ignoring");
            return None;
        }
        self.ran = true;

        let config = &self.config;
        let commands = nav::highlight(doc, &config.nav);
        let skill_bars = Reveal::install(
            doc,
            &Selector::Class(config.skills.class.clone()),
            config.skills.reveal_spec(),
        );
        let anchors = anchor::anchors(doc);
        let fade_ins = Reveal::install(
            doc,
            &Selector::AnyClass(config.fade.classes.clone()),
            config.fade.reveal_spec(),
        );
        let nav_scroll = NavScroll::install(doc, &config.scroll);

        Some(Installation {
            commands,
            skill_bars,
            anchors,
            fade_ins,
            nav_scroll,
        })
    }
}

impl Default for Enhancer {
    fn default() -> Self {
        Self::new(EnhanceConfig::default())
    }
}
