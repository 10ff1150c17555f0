//! Named high-level actions composed from a locator and a pointer.

use crate::clock::Clock;
use crate::config::AutomationConfig;
use crate::input::Pointer;
use crate::locate::{ClickOutcome, Locator, Match};
use crate::primitive::MatchPrimitive;
use crate::template::{Template, TemplateResources};
use crate::trace::trace_event;
use thiserror::Error;

/// Why an action did not complete.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ActionError {
    /// No action with this name is configured.
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    /// The action's template image does not exist.
    #[error("action `{action}`: template {template} does not exist")]
    ResourceMissing { action: String, template: Template },
    /// The template was not found before the timeout.
    #[error("action `{action}`: {template} not found on screen")]
    NotFound { action: String, template: Template },
    /// The template was found but clicking it failed.
    #[error("action `{action}`: click failed: {reason}")]
    ClickFailed { action: String, reason: String },
    /// The sequence was cancelled while waiting.
    #[error("action `{action}` cancelled")]
    Cancelled { action: String },
}

/// A group of named click actions sharing one locator and one pointer.
///
/// Groups borrow the locator, so several groups (one per screen or page of
/// the application) can share a single capture handle.
pub struct ActionGroup<'a, P, R, C, I: ?Sized> {
    locator: &'a Locator<P, R, C>,
    pointer: &'a I,
    config: &'a AutomationConfig,
}

impl<'a, P, R, C, I> ActionGroup<'a, P, R, C, I>
where
    P: MatchPrimitive,
    R: TemplateResources,
    C: Clock,
    I: Pointer + ?Sized,
{
    /// Creates a group over the actions in `config`.
    pub fn new(locator: &'a Locator<P, R, C>, pointer: &'a I, config: &'a AutomationConfig) -> Self {
        Self {
            locator,
            pointer,
            config,
        }
    }

    /// Returns the names of all configured actions, sorted.
    pub fn action_names(&self) -> impl Iterator<Item = &'a str> {
        self.config.actions.keys().map(String::as_str)
    }

    /// Clicks the action's template, waiting up to its timeout.
    pub fn perform(&self, name: &str) -> Result<Match, ActionError> {
        let spec = self
            .config
            .action(name)
            .ok_or_else(|| ActionError::UnknownAction(name.to_string()))?;
        let template = self.config.template_for(spec);
        let timeout = self.config.timeout_for(spec);
        trace_event!(INFO, "executing action", action = name, template = template);

        let outcome = match spec.retries {
            Some(retries) if retries > 1 => {
                self.locator
                    .click_with_retry(self.pointer, &template, timeout, retries)
            }
            _ => self.locator.click(self.pointer, &template, timeout),
        };
        let action = name.to_string();
        match outcome {
            ClickOutcome::Clicked(m) => Ok(m),
            ClickOutcome::NotFound => Err(ActionError::NotFound { action, template }),
            ClickOutcome::ResourceMissing => Err(ActionError::ResourceMissing { action, template }),
            ClickOutcome::Cancelled => Err(ActionError::Cancelled { action }),
            ClickOutcome::Failed { error, .. } => Err(ActionError::ClickFailed {
                action,
                reason: error.to_string(),
            }),
        }
    }

    /// Performs actions in order with the configured settle delay between
    /// them. Stops at the first failure or cancelled delay.
    pub fn run_sequence<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Match>, ActionError> {
        let delay = self.config.inter_action_delay();
        let mut done = Vec::with_capacity(names.len());
        for (step, name) in names.iter().enumerate() {
            let name = name.as_ref();
            if step > 0 && self.locator.clock().sleep(delay).is_err() {
                trace_event!(WARN, "settle delay interrupted", before = name);
                return Err(ActionError::Cancelled {
                    action: name.to_string(),
                });
            }
            trace_event!(INFO, "sequence step", step = step + 1, action = name);
            done.push(self.perform(name)?);
        }
        Ok(done)
    }

    /// Returns true when the action's template is currently visible.
    pub fn is_visible(&self, name: &str) -> Result<bool, ActionError> {
        let spec = self
            .config
            .action(name)
            .ok_or_else(|| ActionError::UnknownAction(name.to_string()))?;
        Ok(self.locator.exists(&self.config.template_for(spec)))
    }
}
