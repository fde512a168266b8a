//! The action lifecycle: command + resolved element handles in, a running,
//! observable, run-once automation out.
//!
//! An [`Automation`] drives one simulated user action through target
//! re-validation, scroll adjustment and dispatch. It performs no retries
//! and owns no timeout; both are the orchestrator's policy, layered on top
//! by re-creating automations or racing [`Automation::run`] against a
//! timer (see [`Automation::run_with_timeout`]).

use crate::element::DomElement;
use crate::errors::AutomationError;
use crate::geometry::{clamp_scroll, scroll_deficit, AxisValues};
use crate::platforms::PlatformAdapter;
use crate::scrolling::ScrollabilityAnalyzer;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};

pub mod command;
pub mod handlers;

pub use command::{ActionCommand, ActionKind, Interaction};
pub use handlers::{handler_for, AutomationHandler, HandlerContext};

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Where an automation currently is in its lifecycle. Terminal states are
/// `Completed` and `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomationStage {
    Created,
    TargetResolving,
    ScrollAdjusting,
    Executing,
    Completed,
    Failed,
}

/// The fixed, enumerable set of signals an automation publishes while it
/// runs. Observers subscribe before calling `run`; publication never
/// blocks and events to a lagging or absent observer are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    StageChanged(AutomationStage),
    /// The target element was confirmed present, which may be well before
    /// completion.
    TargetElementFound,
    /// One ancestor scroll adjustment was applied.
    ScrollAdjusted,
}

/// What a completed action reports back to the orchestrator.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    /// Final viewport coordinates of the interaction, when one was
    /// dispatched.
    pub coordinates: Option<(f64, f64)>,
    pub details: String,
}

/// A single runnable simulated action.
///
/// Owned exclusively by the caller that created it for the duration of one
/// action; `run` consumes the automation, so reuse across actions is ruled
/// out by the type system. Abandoning the future cancels the action; no
/// cleanup is required because the only page mutations before dispatch are
/// scroll positions.
pub struct Automation {
    command: ActionCommand,
    elements: Vec<DomElement>,
    adapter: Arc<dyn PlatformAdapter>,
    events: broadcast::Sender<LifecycleEvent>,
    selector_props: &'static [&'static str],
    publishes_target_found: bool,
    stage: AutomationStage,
}

impl Automation {
    pub(crate) fn new(
        ctx: HandlerContext,
        selector_props: &'static [&'static str],
        publishes_target_found: bool,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            command: ctx.command,
            elements: ctx.elements,
            adapter: ctx.adapter,
            events,
            selector_props,
            publishes_target_found,
            stage: AutomationStage::Created,
        }
    }

    pub fn command(&self) -> &ActionCommand {
        &self.command
    }

    pub fn elements(&self) -> &[DomElement] {
        &self.elements
    }

    pub fn stage(&self) -> AutomationStage {
        self.stage
    }

    /// Subscribe to lifecycle events. Must be called before `run`, which
    /// consumes the automation.
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.events.subscribe()
    }

    /// Drives the action to completion.
    ///
    /// Under `strict_element_check` the target must be attached and
    /// visible at resolution time; the operation fails fast otherwise.
    /// Without it, an invisible target is tolerated best-effort, but a
    /// detached handle still fails because nothing can be measured.
    #[instrument(level = "debug", skip(self), fields(kind = %self.command.kind()))]
    pub async fn run(mut self, strict_element_check: bool) -> Result<ActionOutcome, AutomationError> {
        match self.drive(strict_element_check).await {
            Ok(outcome) => {
                self.transition(AutomationStage::Completed);
                Ok(outcome)
            }
            Err(err) => {
                warn!(error = %err, "automation failed");
                self.transition(AutomationStage::Failed);
                Err(err)
            }
        }
    }

    /// Races `run` against a timer, reporting elapse as a distinct
    /// [`AutomationError::Timeout`] failure.
    pub async fn run_with_timeout(
        self,
        strict_element_check: bool,
        timeout: Duration,
    ) -> Result<ActionOutcome, AutomationError> {
        let kind = self.command.kind();
        tokio::time::timeout(timeout, self.run(strict_element_check))
            .await
            .map_err(|_| {
                AutomationError::Timeout(format!(
                    "{kind} action did not complete within {timeout:?}"
                ))
            })?
    }

    async fn drive(
        &mut self,
        strict_element_check: bool,
    ) -> Result<ActionOutcome, AutomationError> {
        self.transition(AutomationStage::TargetResolving);
        let target = self.resolve_target(strict_element_check)?;
        if self.publishes_target_found {
            self.publish(LifecycleEvent::TargetElementFound);
        }

        self.transition(AutomationStage::ScrollAdjusting);
        let point = self.bring_points_into_view(&target).await?;

        self.transition(AutomationStage::Executing);
        if !target.is_attached()? {
            return Err(AutomationError::TargetDetached(format!(
                "target <{}> was removed before the {} interaction could be dispatched",
                target.tag_name(),
                self.command.kind()
            )));
        }

        let interaction = self.build_interaction(point)?;
        let coordinates = match &interaction {
            Some(interaction) => {
                self.adapter.dispatch(&target, interaction).await?;
                let point = interaction.point();
                Some((point.x, point.y))
            }
            // Scroll-into-view completes with the adjustment phase itself.
            None => Some((point.x, point.y)),
        };

        Ok(ActionOutcome {
            kind: self.command.kind(),
            coordinates,
            details: format!("{} dispatched at {:?}", self.command.kind(), coordinates),
        })
    }

    /// Re-validates the element handles captured at construction time.
    /// The DOM may have mutated since the caller resolved them.
    fn resolve_target(
        &self,
        strict_element_check: bool,
    ) -> Result<DomElement, AutomationError> {
        let Some(target) = self.elements.first() else {
            return Err(AutomationError::TargetNotFound(format!(
                "no candidate element for {} action",
                self.command.kind()
            )));
        };

        self.check_element(target, strict_element_check)?;
        if matches!(self.command, ActionCommand::DragToElement { .. }) {
            let destination = self.destination_element()?;
            self.check_element(&destination, strict_element_check)?;
        }
        Ok(target.clone())
    }

    fn check_element(
        &self,
        element: &DomElement,
        strict_element_check: bool,
    ) -> Result<(), AutomationError> {
        if !element.is_attached()? {
            return Err(AutomationError::TargetDetached(format!(
                "element <{}> is no longer attached to the document",
                element.tag_name()
            )));
        }
        if strict_element_check && !element.is_visible()? {
            return Err(AutomationError::TargetNotVisible(format!(
                "element <{}> is attached but not visible",
                element.tag_name()
            )));
        }
        for prop in self.selector_props {
            if element.attribute(prop).is_none() {
                return Err(AutomationError::TargetNotFound(format!(
                    "element <{}> no longer matches the selector: missing `{prop}`",
                    element.tag_name()
                )));
            }
        }
        Ok(())
    }

    fn destination_element(&self) -> Result<DomElement, AutomationError> {
        self.elements.get(1).cloned().ok_or_else(|| {
            AutomationError::InvalidCommandArgs(
                "drag-to-element requires a destination element".to_string(),
            )
        })
    }

    /// Brings every point the interaction will touch into view: the
    /// primary target point, then the drag end point (for drag-by-offset)
    /// or the destination element's point (for drag-to-element). Returns
    /// the primary point as finally measured, since a later adjustment
    /// can shift the coordinate frame of an earlier one.
    async fn bring_points_into_view(
        &self,
        target: &DomElement,
    ) -> Result<AxisValues<f64>, AutomationError> {
        self.bring_into_view(target, self.command.offset(), AxisValues::default())
            .await?;

        match &self.command {
            ActionCommand::Drag { drag_offset, .. } => {
                self.bring_into_view(target, self.command.offset(), *drag_offset)
                    .await?;
            }
            ActionCommand::DragToElement {
                destination_offset, ..
            } => {
                let destination = self.destination_element()?;
                self.bring_into_view(&destination, *destination_offset, AxisValues::default())
                    .await?;
            }
            _ => {}
        }

        self.point_of(target, self.command.offset(), AxisValues::default())
    }

    /// Walks the element's scrollable-ancestor chain nearest first and
    /// scrolls each ancestor the minimum amount needed to bring the
    /// interaction point into view. Each adjustment is observed (the
    /// render settles, the point is re-measured) before the next ancestor
    /// is considered, because an outer scroll changes the coordinate frame
    /// of everything inside it. Outer containers are left untouched when
    /// the inner ones suffice.
    async fn bring_into_view(
        &self,
        element: &DomElement,
        offset: Option<AxisValues<f64>>,
        shift: AxisValues<f64>,
    ) -> Result<(), AutomationError> {
        let parents = ScrollabilityAnalyzer::new(self.adapter.as_ref()).scrollable_parents(element);

        for parent in &parents {
            let point = self.point_of(element, offset, shift)?;
            let Ok(view) = parent.bounding_rect() else {
                continue;
            };
            let deficit = scroll_deficit(&point, &view);
            if deficit.x == 0.0 && deficit.y == 0.0 {
                continue;
            }

            let position = parent.scroll_position()?;
            let range = parent.scroll_size()?.sub(parent.client_size()?);
            let next = clamp_scroll(position.add(deficit), range);
            debug!(
                parent = parent.object_id(),
                deficit.x, deficit.y, "applying scroll adjustment"
            );
            parent.set_scroll_position(next)?;
            self.publish(LifecycleEvent::ScrollAdjusted);
            self.adapter.wait_for_render().await?;
        }

        Ok(())
    }

    /// An interaction point in viewport coordinates: the element's current
    /// bounding position plus the requested intra-element offset (element
    /// center when absent), plus a further shift for points derived from
    /// the primary one, such as a drag end point.
    fn point_of(
        &self,
        element: &DomElement,
        offset: Option<AxisValues<f64>>,
        shift: AxisValues<f64>,
    ) -> Result<AxisValues<f64>, AutomationError> {
        let rect = element.bounding_rect()?;
        let offset =
            offset.unwrap_or_else(|| AxisValues::new(rect.width() / 2.0, rect.height() / 2.0));
        Ok(rect.position().add(offset).add(shift))
    }

    /// Resolves the command into its dispatchable form. `None` for
    /// scroll-into-view, which has nothing left to dispatch.
    fn build_interaction(
        &self,
        point: AxisValues<f64>,
    ) -> Result<Option<Interaction>, AutomationError> {
        let interaction = match &self.command {
            ActionCommand::Click { .. } => Some(Interaction::Click { point }),
            ActionCommand::Hover { .. } => Some(Interaction::Hover { point }),
            ActionCommand::TypeText { text, .. } => Some(Interaction::TypeText {
                text: text.clone(),
                point,
            }),
            ActionCommand::Drag { drag_offset, .. } => Some(Interaction::Drag {
                from: point,
                to: point.add(*drag_offset),
            }),
            ActionCommand::DragToElement {
                destination_offset, ..
            } => {
                let destination = self.destination_element()?;
                let rect = destination.bounding_rect()?;
                let offset = destination_offset
                    .unwrap_or_else(|| AxisValues::new(rect.width() / 2.0, rect.height() / 2.0));
                Some(Interaction::Drag {
                    from: point,
                    to: rect.position().add(offset),
                })
            }
            ActionCommand::ScrollIntoView { .. } => None,
        };
        Ok(interaction)
    }

    fn transition(&mut self, stage: AutomationStage) {
        debug!(from = ?self.stage, to = ?stage, "lifecycle transition");
        self.stage = stage;
        self.publish(LifecycleEvent::StageChanged(stage));
    }

    fn publish(&self, event: LifecycleEvent) {
        // Nobody listening is fine; events are advisory.
        let _ = self.events.send(event);
    }
}

impl fmt::Debug for Automation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Automation")
            .field("command", &self.command)
            .field("elements", &self.elements.len())
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}
