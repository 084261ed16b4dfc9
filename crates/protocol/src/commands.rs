use serde::{Deserialize, Serialize};

use crate::types::NodeId;

/// A single DOM mutation requested by an enhancement.
///
/// The core emits a `Vec<DomCommand>` for each event it handles. Hosts apply
/// the list in order; each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DomCommand {
    /// Add a CSS class to an element's class list.
    AddClass { node: NodeId, class: String },

    /// Write an inline style property.
    SetStyle {
        node: NodeId,
        property: StyleProperty,
        value: String,
    },

    /// Scroll the page so that `node` becomes visible.
    ScrollIntoView {
        node: NodeId,
        behavior: ScrollBehavior,
        block: ScrollBlock,
    },

    /// Apply `commands` once `delay_ms` has elapsed. Fire-and-forget: nothing
    /// waits on it and it cannot be cancelled.
    Defer {
        delay_ms: u32,
        commands: Vec<DomCommand>,
    },
}

impl DomCommand {
    pub fn set_style(node: NodeId, property: StyleProperty, value: impl Into<String>) -> Self {
        Self::SetStyle {
            node,
            property,
            value: value.into(),
        }
    }

    /// The element this command targets, if any. `Defer` has no single target.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::AddClass { node, .. }
            | Self::SetStyle { node, .. }
            | Self::ScrollIntoView { node, .. } => Some(*node),
            Self::Defer { .. } => None,
        }
    }
}

/// Inline style properties the enhancements write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleProperty {
    Width,
    Opacity,
    Transform,
    Transition,
    BorderBottomColor,
}

impl StyleProperty {
    /// The property name as accepted by `CSSStyleDeclaration.setProperty`.
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Opacity => "opacity",
            Self::Transform => "transform",
            Self::Transition => "transition",
            Self::BorderBottomColor => "border-bottom-color",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    Auto,
    Instant,
    Smooth,
}

/// Vertical alignment of the scrolled-to element within the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBlock {
    Start,
    Center,
    End,
    Nearest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_names_are_kebab_case() {
        assert_eq!(StyleProperty::BorderBottomColor.css_name(), "border-bottom-color");
        assert_eq!(StyleProperty::Width.css_name(), "width");
    }

    #[test]
    fn defer_has_no_target() {
        let cmd = DomCommand::Defer {
            delay_ms: 50,
            commands: vec![DomCommand::set_style(NodeId(1), StyleProperty::Opacity, "1")],
        };
        assert_eq!(cmd.node(), None);
        let DomCommand::Defer { commands, .. } = cmd else {
            unreachable!()
        };
        assert_eq!(commands[0].node(), Some(NodeId(1)));
    }

    #[test]
    fn serializes_with_op_tag() {
        let cmd = DomCommand::AddClass {
            node: NodeId(3),
            class: "active".into(),
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["op"], "add_class");
        assert_eq!(json["node"], 3);
        assert_eq!(json["class"], "active");
    }
}
