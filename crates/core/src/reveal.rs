use std::collections::BTreeSet;

use folio_protocol::{DomCommand, NodeId, Selector, StyleProperty};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::dom::Document;

/// One visibility report for a watched element, as delivered by an
/// `IntersectionObserver` callback or by a polling host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibilityEntry {
    pub node: NodeId,
    /// Fraction of the element inside the viewport, `0..=1`.
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl VisibilityEntry {
    /// Entry for a polled ratio; any overlap counts as intersecting.
    pub fn from_ratio(node: NodeId, ratio: f64) -> Self {
        Self {
            node,
            ratio,
            is_intersecting: ratio > 0.0,
        }
    }
}

/// What happens to an element the first time it is revealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RevealEffect {
    /// Grow a progress bar's width to the percentage stored in `attribute`.
    SkillFill { attribute: String },
    /// Slide up from `offset_px` below while fading in over `duration_s`.
    FadeIn { offset_px: f64, duration_s: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealSpec {
    pub threshold: f64,
    /// Stagger applied before the final style write.
    pub delay_ms: u32,
    pub effect: RevealEffect,
}

impl RevealSpec {
    pub fn skill_fill() -> Self {
        crate::config::SkillConfig::default().reveal_spec()
    }

    pub fn fade_in() -> Self {
        crate::config::FadeConfig::default().reveal_spec()
    }
}

/// Output of one visibility callback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevealBatch {
    pub commands: Vec<DomCommand>,
    /// Nodes that fired and must no longer be observed.
    pub released: Vec<NodeId>,
}

impl RevealBatch {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.released.is_empty()
    }
}

/// One-shot visibility registry.
///
/// Each watched node fires its effect the first time it is reported at or
/// above the threshold, and is dropped from the registry in the same step.
/// A node can therefore animate at most once per page load.
#[derive(Debug, Clone)]
pub struct Reveal {
    spec: RevealSpec,
    watching: BTreeSet<NodeId>,
}

impl Reveal {
    pub fn new(spec: RevealSpec) -> Self {
        Self {
            spec,
            watching: BTreeSet::new(),
        }
    }

    /// Watch every element matching `selector`. Returns `None` when nothing
    /// matches, in which case no observer should be created.
    pub fn install<D: Document + ?Sized>(
        doc: &D,
        selector: &Selector,
        spec: RevealSpec,
    ) -> Option<Self> {
        let nodes = doc.select(selector);
        if nodes.is_empty() {
            debug!("reveal: nothing matches {}", selector.to_css());
            return None;
        }
        debug!(
            "reveal: watching {} element(s) for {} at threshold {}",
            nodes.len(),
            selector.to_css(),
            spec.threshold
        );
        let mut reveal = Self::new(spec);
        reveal.observe(nodes);
        Some(reveal)
    }

    pub fn spec(&self) -> &RevealSpec {
        &self.spec
    }

    pub fn observe(&mut self, nodes: impl IntoIterator<Item = NodeId>) {
        self.watching.extend(nodes);
    }

    pub fn is_watching(&self, node: NodeId) -> bool {
        self.watching.contains(&node)
    }

    pub fn watched(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.watching.iter().copied()
    }

    /// Every watched element has fired.
    pub fn is_done(&self) -> bool {
        self.watching.is_empty()
    }

    pub fn on_visibility<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        entries: &[VisibilityEntry],
    ) -> RevealBatch {
        let mut batch = RevealBatch::default();
        for entry in entries {
            if !entry.is_intersecting || entry.ratio < self.spec.threshold {
                continue;
            }
            // Unobserve before mutating: a duplicate entry in the same
            // callback must not fire twice.
            if !self.watching.remove(&entry.node) {
                continue;
            }
            batch.released.push(entry.node);
            self.effect(doc, entry.node, &mut batch.commands);
        }
        batch
    }

    fn effect<D: Document + ?Sized>(&self, doc: &D, node: NodeId, out: &mut Vec<DomCommand>) {
        match &self.spec.effect {
            RevealEffect::SkillFill { attribute } => {
                let raw = doc.attribute(node, attribute);
                let Some(progress) = raw.as_deref().and_then(parse_progress) else {
                    debug!("reveal: {node} has no usable {attribute} ({raw:?})");
                    return;
                };
                out.push(DomCommand::Defer {
                    delay_ms: self.spec.delay_ms,
                    commands: vec![DomCommand::set_style(
                        node,
                        StyleProperty::Width,
                        format!("{progress}%"),
                    )],
                });
            }
            RevealEffect::FadeIn {
                offset_px,
                duration_s,
            } => {
                out.push(DomCommand::set_style(node, StyleProperty::Opacity, "0"));
                out.push(DomCommand::set_style(
                    node,
                    StyleProperty::Transform,
                    format!("translateY({offset_px}px)"),
                ));
                out.push(DomCommand::set_style(
                    node,
                    StyleProperty::Transition,
                    format!("opacity {duration_s}s ease, transform {duration_s}s ease"),
                ));
                out.push(DomCommand::Defer {
                    delay_ms: self.spec.delay_ms,
                    commands: vec![
                        DomCommand::set_style(node, StyleProperty::Opacity, "1"),
                        DomCommand::set_style(node, StyleProperty::Transform, "translateY(0)"),
                    ],
                });
            }
        }
    }
}

/// The attribute text, trimmed, when it reads as a finite number. Written
/// back verbatim so `85.0` stays `85.0%`.
fn parse_progress(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .is_ok_and(f64::is_finite)
        .then_some(trimmed)
}
