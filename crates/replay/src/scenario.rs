use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use folio_core::memory::{Element, MemoryDocument, ScrollRecord};
use folio_core::session::HeadlessSession;
use folio_core::{EnhanceConfig, ReadyState};
use folio_protocol::{NodeId, StyleProperty};
use log::info;
use serde::{Deserialize, Serialize};

/// A scripted page visit.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub path: String,
    #[serde(default = "default_ready_state")]
    pub ready_state: ReadyState,
    #[serde(default)]
    pub viewport: Option<ViewportSize>,
    #[serde(default)]
    pub config: Option<serde_json::Value>,
    pub elements: Vec<Element>,
    #[serde(default)]
    pub events: Vec<Event>,
}

fn default_ready_state() -> ReadyState {
    ReadyState::Complete
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    DomContentLoaded,
    Scroll { y: f64 },
    /// Click by element index.
    Click { node: u32 },
    /// Click the first element whose `href` equals `href`.
    ClickHref { href: String },
    Advance { ms: u64 },
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub enhanced: bool,
    pub scroll_y: f64,
    pub now_ms: u64,
    pub elements: Vec<ElementReport>,
    pub scrolls: Vec<ScrollRecord>,
    pub clicks: Vec<ClickReport>,
}

#[derive(Debug, Serialize)]
pub struct ElementReport {
    pub node: NodeId,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<&'static str, String>,
}

#[derive(Debug, Serialize)]
pub struct ClickReport {
    pub node: NodeId,
    pub prevent_default: bool,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid scenario")
    }

    fn config(&self) -> Result<EnhanceConfig> {
        let Some(value) = &self.config else {
            return Ok(EnhanceConfig::default());
        };
        Ok(EnhanceConfig::from_json(&value.to_string())?)
    }

    /// Load the page, play every event in order and report the final DOM.
    pub fn run(self) -> Result<Report> {
        let config = self.config()?;
        let mut doc = MemoryDocument::new(&self.path).with_ready_state(self.ready_state);
        if let Some(size) = self.viewport {
            doc = doc.with_viewport(size.width, size.height);
        }
        for element in self.elements {
            doc.push(element);
        }

        let mut session = HeadlessSession::new(doc, config);
        session.load();

        let mut clicks = Vec::new();
        for (i, event) in self.events.into_iter().enumerate() {
            info!("event {i}: {event:?}");
            match event {
                Event::DomContentLoaded => session.dom_content_loaded(),
                Event::Scroll { y } => session.scroll_to(y),
                Event::Click { node } => {
                    let node = NodeId(node);
                    if session.doc().element(node).is_none() {
                        bail!("event {i}: no element {node}");
                    }
                    let outcome = session.click(node);
                    clicks.push(ClickReport {
                        node,
                        prevent_default: outcome.prevent_default,
                    });
                }
                Event::ClickHref { href } => {
                    let node = session
                        .doc()
                        .elements()
                        .find(|(_, e)| e.attributes.get("href") == Some(&href))
                        .map(|(node, _)| node)
                        .with_context(|| format!("event {i}: no element with href {href:?}"))?;
                    let outcome = session.click(node);
                    clicks.push(ClickReport {
                        node,
                        prevent_default: outcome.prevent_default,
                    });
                }
                Event::Advance { ms } => session.advance(ms),
            }
        }

        let enhanced = session.is_enhanced();
        let doc = session.into_document();
        Ok(Report {
            enhanced,
            scroll_y: doc.viewport().scroll_y,
            now_ms: doc.now_ms(),
            elements: doc
                .elements()
                .map(|(node, e)| ElementReport {
                    node,
                    tag: e.tag.clone(),
                    id: e.id.clone(),
                    classes: e.classes.clone(),
                    style: e
                        .style
                        .iter()
                        .map(|(p, v): (&StyleProperty, &String)| (p.css_name(), v.clone()))
                        .collect(),
                })
                .collect(),
            scrolls: doc.scrolls().to_vec(),
            clicks,
        })
    }
}
