//! Locate-then-click.

use super::{Locator, Match, SearchOutcome};
use crate::clock::Clock;
use crate::input::Pointer;
use crate::primitive::MatchPrimitive;
use crate::template::{Template, TemplateResources};
use crate::trace::trace_event;
use crate::util::OnsightError;
use std::time::Duration;

/// Result of a locate-and-click.
#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    /// The template was found and clicked.
    Clicked(Match),
    /// The template was not found in time.
    NotFound,
    /// The template resource does not exist.
    ResourceMissing,
    /// A pause was interrupted before the template was found.
    Cancelled,
    /// The template was found but the click could not be delivered.
    Failed {
        /// Where the template was found.
        at: Match,
        /// Why the click failed.
        error: OnsightError,
    },
}

impl ClickOutcome {
    /// Returns true only for [`ClickOutcome::Clicked`].
    pub fn is_clicked(&self) -> bool {
        matches!(self, Self::Clicked(_))
    }
}

impl<P: MatchPrimitive, R: TemplateResources, C: Clock> Locator<P, R, C> {
    /// Locates `template` and clicks its center; true only if both succeed.
    ///
    /// Never panics or propagates on click failure: a target that was seen
    /// but could not be clicked is logged and reported as `false`.
    pub fn click_on_sight<I: Pointer + ?Sized>(
        &self,
        pointer: &I,
        template: &Template,
        timeout: Duration,
    ) -> bool {
        self.click(pointer, template, timeout).is_clicked()
    }

    /// Like [`click_on_sight`](Self::click_on_sight) but reports why a click
    /// did not happen.
    pub fn click<I: Pointer + ?Sized>(
        &self,
        pointer: &I,
        template: &Template,
        timeout: Duration,
    ) -> ClickOutcome {
        trace_event!(INFO, "attempting to click image", template = template);
        let outcome = self.locate(template, timeout);
        click_found(pointer, template, outcome)
    }

    /// Clicks after [`locate_with_retry`](Self::locate_with_retry).
    pub fn click_with_retry<I: Pointer + ?Sized>(
        &self,
        pointer: &I,
        template: &Template,
        timeout: Duration,
        max_retries: u32,
    ) -> ClickOutcome {
        let outcome = self.locate_with_retry(template, timeout, max_retries);
        click_found(pointer, template, outcome)
    }
}

fn click_found<I: Pointer + ?Sized>(
    pointer: &I,
    template: &Template,
    outcome: SearchOutcome,
) -> ClickOutcome {
    let found = match outcome {
        SearchOutcome::Found(m) => m,
        SearchOutcome::NotFound => {
            trace_event!(WARN, "cannot click, image not found", template = template);
            return ClickOutcome::NotFound;
        }
        SearchOutcome::ResourceMissing => return ClickOutcome::ResourceMissing,
        SearchOutcome::Cancelled => return ClickOutcome::Cancelled,
    };
    let target = found.target();
    match pointer.click(target) {
        Ok(()) => {
            trace_event!(INFO, "clicked image", x = target.x, y = target.y);
            ClickOutcome::Clicked(found)
        }
        Err(error) => {
            trace_event!(
                ERROR,
                "failed to click image",
                x = target.x,
                y = target.y,
                error = error
            );
            ClickOutcome::Failed { at: found, error }
        }
    }
}
