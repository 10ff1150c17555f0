//! Whole-cycle retry on top of [`Locator::locate`].

use super::{Locator, SearchOutcome};
use crate::clock::Clock;
use crate::primitive::MatchPrimitive;
use crate::template::{Template, TemplateResources};
use crate::trace::trace_event;
use std::time::Duration;

impl<P: MatchPrimitive, R: TemplateResources, C: Clock> Locator<P, R, C> {
    /// Runs up to `max_retries` full searches, each with its own fresh
    /// `timeout`, pausing the configured retry interval between them.
    ///
    /// Transient UI states (animations, overlays) can hide a target for a
    /// whole cycle; the next cycle starts the ladder again from the top.
    /// A missing template is reported before any cycle runs, even with a
    /// zero budget. A cancelled pause returns [`SearchOutcome::Cancelled`]
    /// without further cycles.
    pub fn locate_with_retry(
        &self,
        template: &Template,
        timeout: Duration,
        max_retries: u32,
    ) -> SearchOutcome {
        trace_event!(
            INFO,
            "waiting for image with retries",
            template = template,
            max_retries = max_retries
        );
        if !self.check_resource(template) {
            return SearchOutcome::ResourceMissing;
        }
        for attempt in 1..=max_retries {
            trace_event!(DEBUG, "search cycle", attempt = attempt, max_retries = max_retries);
            match self.locate(template, timeout) {
                SearchOutcome::NotFound => {}
                SearchOutcome::Found(m) => {
                    trace_event!(INFO, "image found on attempt", attempt = attempt);
                    return SearchOutcome::Found(m);
                }
                other => return other,
            }
            if attempt < max_retries && self.clock.sleep(self.retry_pause).is_err() {
                trace_event!(WARN, "retry interrupted", template = template, attempt = attempt);
                return SearchOutcome::Cancelled;
            }
        }
        trace_event!(
            WARN,
            "image not found after retries",
            template = template,
            max_retries = max_retries
        );
        SearchOutcome::NotFound
    }
}
