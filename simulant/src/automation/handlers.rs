//! One handler per action kind, registered in a process-wide lookup.
//!
//! Handlers validate and enrich the incoming command and element set,
//! then produce the common [`Automation`] abstraction; there is no
//! per-action automation subtype, only per-action validation and
//! descriptor data (selector props, event publication).

use crate::automation::{ActionCommand, ActionKind, Automation};
use crate::element::DomElement;
use crate::errors::AutomationError;
use crate::geometry::AxisValues;
use crate::platforms::PlatformAdapter;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

/// Everything a handler needs to build an automation.
pub struct HandlerContext {
    pub adapter: Arc<dyn PlatformAdapter>,
    pub command: ActionCommand,
    pub elements: Vec<DomElement>,
}

/// Per-action-kind descriptor. Immutable after registration.
pub trait AutomationHandler: Send + Sync {
    fn kind(&self) -> ActionKind;

    /// Builds the automation from an already-validated context.
    fn create(&self, ctx: HandlerContext) -> Result<Automation, AutomationError> {
        Ok(Automation::new(
            ctx,
            self.additional_selector_props(),
            self.publishes_target_found(),
        ))
    }

    /// Precondition over the command arguments. Violations surface as
    /// [`AutomationError::InvalidCommandArgs`].
    fn ensure_cmd_args(&self, _command: &ActionCommand) -> Result<(), AutomationError> {
        Ok(())
    }

    /// Precondition over the candidate element set.
    fn ensure_els_props(&self, elements: &[DomElement]) -> Result<(), AutomationError> {
        if elements.is_empty() {
            return Err(AutomationError::TargetNotFound(format!(
                "no candidate elements supplied for {} action",
                self.kind()
            )));
        }
        Ok(())
    }

    /// Attributes the target must still carry when it is re-validated at
    /// run time; a handle losing one of these no longer matches the
    /// selector it was resolved from.
    fn additional_selector_props(&self) -> &'static [&'static str] {
        &[]
    }

    /// Whether this action publishes the target-found lifecycle event.
    fn publishes_target_found(&self) -> bool {
        true
    }
}

fn ensure_finite_offset(
    offset: &Option<AxisValues<f64>>,
    kind: ActionKind,
) -> Result<(), AutomationError> {
    if let Some(offset) = offset {
        if !offset.x.is_finite() || !offset.y.is_finite() {
            return Err(AutomationError::InvalidCommandArgs(format!(
                "{kind} offset must be finite, got ({}, {})",
                offset.x, offset.y
            )));
        }
    }
    Ok(())
}

struct ClickHandler;

impl AutomationHandler for ClickHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Click
    }

    fn ensure_cmd_args(&self, command: &ActionCommand) -> Result<(), AutomationError> {
        ensure_finite_offset(&command.offset(), self.kind())
    }
}

struct DragHandler;

impl AutomationHandler for DragHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Drag
    }

    fn ensure_cmd_args(&self, command: &ActionCommand) -> Result<(), AutomationError> {
        ensure_finite_offset(&command.offset(), self.kind())?;
        if let ActionCommand::Drag { drag_offset, .. } = command {
            if !drag_offset.x.is_finite() || !drag_offset.y.is_finite() {
                return Err(AutomationError::InvalidCommandArgs(
                    "drag offset must be finite".to_string(),
                ));
            }
            if drag_offset.x == 0.0 && drag_offset.y == 0.0 {
                return Err(AutomationError::InvalidCommandArgs(
                    "drag offset must move the pointer on at least one axis".to_string(),
                ));
            }
        }
        Ok(())
    }
}

struct DragToElementHandler;

impl AutomationHandler for DragToElementHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::DragToElement
    }

    fn ensure_cmd_args(&self, command: &ActionCommand) -> Result<(), AutomationError> {
        ensure_finite_offset(&command.offset(), self.kind())
    }

    fn ensure_els_props(&self, elements: &[DomElement]) -> Result<(), AutomationError> {
        if elements.len() < 2 {
            return Err(AutomationError::TargetNotFound(
                "drag-to-element requires a source and a destination element".to_string(),
            ));
        }
        Ok(())
    }
}

struct TypeTextHandler;

impl AutomationHandler for TypeTextHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::TypeText
    }

    fn ensure_cmd_args(&self, command: &ActionCommand) -> Result<(), AutomationError> {
        ensure_finite_offset(&command.offset(), self.kind())?;
        if let ActionCommand::TypeText { text, .. } = command {
            if text.is_empty() {
                return Err(AutomationError::InvalidCommandArgs(
                    "type-text requires a non-empty text argument".to_string(),
                ));
            }
        }
        Ok(())
    }

    // Typing targets form controls; a handle that lost its `value`
    // attribute re-rendered into something that is no longer one.
    fn additional_selector_props(&self) -> &'static [&'static str] {
        &["value"]
    }
}

struct HoverHandler;

impl AutomationHandler for HoverHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Hover
    }

    fn ensure_cmd_args(&self, command: &ActionCommand) -> Result<(), AutomationError> {
        ensure_finite_offset(&command.offset(), self.kind())
    }
}

struct ScrollIntoViewHandler;

impl AutomationHandler for ScrollIntoViewHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::ScrollIntoView
    }

    fn ensure_cmd_args(&self, command: &ActionCommand) -> Result<(), AutomationError> {
        ensure_finite_offset(&command.offset(), self.kind())
    }

    fn publishes_target_found(&self) -> bool {
        false
    }
}

static REGISTRY: Lazy<HashMap<ActionKind, Box<dyn AutomationHandler>>> = Lazy::new(|| {
    let handlers: Vec<Box<dyn AutomationHandler>> = vec![
        Box::new(ClickHandler),
        Box::new(DragHandler),
        Box::new(DragToElementHandler),
        Box::new(TypeTextHandler),
        Box::new(HoverHandler),
        Box::new(ScrollIntoViewHandler),
    ];
    handlers.into_iter().map(|h| (h.kind(), h)).collect()
});

/// Looks up the handler registered for an action kind. Every variant of
/// [`ActionKind`] is registered at startup.
pub fn handler_for(kind: ActionKind) -> &'static dyn AutomationHandler {
    REGISTRY
        .get(&kind)
        .map(|handler| handler.as_ref())
        .expect("every action kind is registered at startup")
}
