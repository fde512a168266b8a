//! Browser action simulation core
//!
//! This crate reproduces the observable effects of high-level user actions
//! (click, drag, type, hover, scroll-into-view) against a live DOM without
//! a native input-injection API, and does it consistently across browser
//! engines. The two hard parts it owns are the layout math — exact
//! coordinate and scroll adjustments through nested scroll containers,
//! iframe boundaries and per-engine overflow quirks — and the asynchronous
//! action lifecycle that tolerates a DOM mutating, detaching or
//! re-rendering between target resolution and completion.
//!
//! The hosting environment supplies all engine access through the
//! [`PlatformAdapter`] capability set; the crate never touches engine APIs
//! directly. See [`platforms::mock`] for a complete in-memory host used by
//! the crate's own tests.

use std::sync::Arc;
use tracing::instrument;

pub mod automation;
pub mod element;
pub mod errors;
pub mod geometry;
pub mod platforms;
pub mod scrolling;
#[cfg(test)]
mod tests;

pub use automation::{
    ActionCommand, ActionKind, ActionOutcome, Automation, AutomationHandler, AutomationStage,
    HandlerContext, Interaction, LifecycleEvent,
};
pub use element::{DomElement, DomElementImpl};
pub use errors::AutomationError;
pub use geometry::{AxisValues, BoundaryValues, LeftTopValues, RightBottomValues};
pub use platforms::{BrowserFlags, PlatformAdapter};
pub use scrolling::ScrollabilityAnalyzer;

/// The main entry point: matches action commands to their handlers and
/// instantiates automations over an injected platform.
///
/// # Examples
///
/// ```no_run
/// use simulant::{ActionCommand, Simulator};
/// # async fn example(adapter: std::sync::Arc<dyn simulant::PlatformAdapter>, button: simulant::DomElement) -> Result<(), simulant::AutomationError> {
/// let simulator = Simulator::new(adapter);
/// let automation = simulator.automation(ActionCommand::Click { offset: None }, vec![button])?;
/// let outcome = automation.run(true).await?;
/// println!("clicked at {:?}", outcome.coordinates);
/// # Ok(())
/// # }
/// ```
pub struct Simulator {
    adapter: Arc<dyn PlatformAdapter>,
}

impl Simulator {
    pub fn new(adapter: Arc<dyn PlatformAdapter>) -> Self {
        Self { adapter }
    }

    /// The injected platform capability set.
    pub fn adapter(&self) -> Arc<dyn PlatformAdapter> {
        self.adapter.clone()
    }

    /// A scrollability analyzer bound to this simulator's platform.
    pub fn analyzer(&self) -> ScrollabilityAnalyzer<'_> {
        ScrollabilityAnalyzer::new(self.adapter.as_ref())
    }

    /// Matches `command` to its registered handler, runs the handler's
    /// preconditions over the command and the already-resolved element
    /// handles, and instantiates the automation.
    #[instrument(level = "debug", skip(self, elements), fields(kind = %command.kind()))]
    pub fn automation(
        &self,
        command: ActionCommand,
        elements: Vec<DomElement>,
    ) -> Result<Automation, AutomationError> {
        let handler = automation::handler_for(command.kind());
        handler.ensure_cmd_args(&command)?;
        handler.ensure_els_props(&elements)?;
        handler.create(HandlerContext {
            adapter: self.adapter.clone(),
            command,
            elements,
        })
    }
}

impl Clone for Simulator {
    fn clone(&self) -> Self {
        Self {
            adapter: self.adapter.clone(),
        }
    }
}
