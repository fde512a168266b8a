use crate::geometry::AxisValues;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The user-facing description of an intended interaction, as produced by
/// the test runner. Offsets are relative to the target's border box;
/// `None` means the element center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ActionCommand {
    Click {
        #[serde(default)]
        offset: Option<AxisValues<f64>>,
    },
    /// Drag the target by a fixed offset.
    Drag {
        #[serde(default)]
        offset: Option<AxisValues<f64>>,
        drag_offset: AxisValues<f64>,
    },
    /// Drag the target onto a destination element (the second element
    /// handle supplied to the handler).
    DragToElement {
        #[serde(default)]
        offset: Option<AxisValues<f64>>,
        #[serde(default)]
        destination_offset: Option<AxisValues<f64>>,
    },
    TypeText {
        text: String,
        #[serde(default)]
        offset: Option<AxisValues<f64>>,
    },
    Hover {
        #[serde(default)]
        offset: Option<AxisValues<f64>>,
    },
    ScrollIntoView {
        #[serde(default)]
        offset: Option<AxisValues<f64>>,
    },
}

impl ActionCommand {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Click { .. } => ActionKind::Click,
            Self::Drag { .. } => ActionKind::Drag,
            Self::DragToElement { .. } => ActionKind::DragToElement,
            Self::TypeText { .. } => ActionKind::TypeText,
            Self::Hover { .. } => ActionKind::Hover,
            Self::ScrollIntoView { .. } => ActionKind::ScrollIntoView,
        }
    }

    /// The requested intra-element offset, common to every variant.
    pub fn offset(&self) -> Option<AxisValues<f64>> {
        match self {
            Self::Click { offset }
            | Self::Drag { offset, .. }
            | Self::DragToElement { offset, .. }
            | Self::TypeText { offset, .. }
            | Self::Hover { offset }
            | Self::ScrollIntoView { offset } => *offset,
        }
    }
}

/// The registry key: one per action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Click,
    Drag,
    DragToElement,
    TypeText,
    Hover,
    ScrollIntoView,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Click => "click",
            Self::Drag => "drag",
            Self::DragToElement => "drag-to-element",
            Self::TypeText => "type-text",
            Self::Hover => "hover",
            Self::ScrollIntoView => "scroll-into-view",
        };
        write!(f, "{name}")
    }
}

/// The resolved, dispatchable form of a command: absolute viewport points
/// computed after all scroll adjustments. This is what crosses into the
/// platform adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Interaction {
    Click { point: AxisValues<f64> },
    Drag { from: AxisValues<f64>, to: AxisValues<f64> },
    TypeText { text: String, point: AxisValues<f64> },
    Hover { point: AxisValues<f64> },
}

impl Interaction {
    /// The primary point of the interaction, for outcome reporting.
    pub fn point(&self) -> AxisValues<f64> {
        match self {
            Self::Click { point } | Self::TypeText { point, .. } | Self::Hover { point } => *point,
            Self::Drag { from, .. } => *from,
        }
    }
}
