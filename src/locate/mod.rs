//! Adaptive template location.
//!
//! A [`Locator`] searches for a template across a descending
//! [`SimilarityLadder`] under a caller-supplied timeout, in two phases:
//!
//! 1. **Fast probe**: one non-blocking [`probe`] per level, highest first.
//!    A target that is already on screen resolves here almost immediately.
//! 2. **Bounded wait**: the time left before the [`Deadline`] is split evenly
//!    across the levels (never less than the configured minimum per level)
//!    and each level gets one [`poll_wait`] bounded by its share.
//!
//! The first level that matches wins; lower levels are never consulted after
//! a match. Primitive errors count as "no match at this attempt". The
//! deadline is checked between attempts, so a search overruns its timeout by
//! at most one in-flight attempt.
//!
//! [`probe`]: crate::primitive::MatchPrimitive::probe
//! [`poll_wait`]: crate::primitive::MatchPrimitive::poll_wait

use crate::clock::{Clock, SystemClock};
use crate::config::LocatorConfig;
use crate::input::Point;
use crate::primitive::{Hit, MatchPrimitive, Region};
use crate::template::{FsResources, Template, TemplateResources};
use crate::trace::{trace_event, trace_span};
use crate::util::{OnsightError, OnsightResult};
use std::time::Duration;

mod click;
mod deadline;
mod ladder;
mod retry;

pub use click::ClickOutcome;
pub use deadline::Deadline;
pub use ladder::{SimilarityLadder, DEFAULT_FALLBACK_LEVELS, FALLBACK_SIMILARITY};

/// Search phase that produced a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchPhase {
    /// Single non-blocking probe.
    Probe,
    /// Polling wait bounded by a per-level share of the timeout.
    Wait,
}

/// A located template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Where the template was found.
    pub region: Region,
    /// Score reported by the primitive.
    pub score: f32,
    /// Ladder level that succeeded.
    pub level: f32,
    /// Phase that found it.
    pub phase: SearchPhase,
}

impl Match {
    fn new(hit: Hit, level: f32, phase: SearchPhase) -> Self {
        Self {
            region: hit.region,
            score: hit.score,
            level,
            phase,
        }
    }

    /// Click target: the center of the matched region.
    pub fn target(&self) -> Point {
        self.region.center()
    }
}

/// Result of a search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SearchOutcome {
    /// The template was found.
    Found(Match),
    /// Every level was tried, or time ran out, without a match.
    NotFound,
    /// The template resource does not exist; nothing was searched.
    ResourceMissing,
    /// A pause between attempts was interrupted.
    Cancelled,
}

impl SearchOutcome {
    /// Returns true for [`SearchOutcome::Found`].
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns the match, if any.
    pub fn found(&self) -> Option<&Match> {
        match self {
            Self::Found(m) => Some(m),
            _ => None,
        }
    }
}

/// Result of one pass over the ladder.
enum Pass {
    Found(Match),
    Exhausted,
    TimedOut,
}

/// Adaptive template locator.
///
/// Owns its matching primitive for the life of the process. `R` checks that
/// a template exists before each search and `C` supplies time and sleeps.
pub struct Locator<P, R = FsResources, C = SystemClock> {
    primitive: P,
    resources: R,
    clock: C,
    ladder: SimilarityLadder,
    min_level_wait: Duration,
    retry_pause: Duration,
}

impl<P: MatchPrimitive> Locator<P> {
    /// Creates a locator with filesystem resources and the system clock.
    pub fn new(primitive: P, config: &LocatorConfig) -> OnsightResult<Self> {
        if config.min_level_wait().is_zero() {
            return Err(OnsightError::InvalidConfig {
                reason: "min_level_wait_ms must be positive".to_string(),
            });
        }
        Ok(Self {
            primitive,
            resources: FsResources,
            clock: SystemClock::new(),
            ladder: config.ladder()?,
            min_level_wait: config.min_level_wait(),
            retry_pause: config.retry_pause(),
        })
    }
}

impl<P, R, C> Locator<P, R, C> {
    /// Replaces the template existence check.
    pub fn with_resources<R2: TemplateResources>(self, resources: R2) -> Locator<P, R2, C> {
        Locator {
            primitive: self.primitive,
            resources,
            clock: self.clock,
            ladder: self.ladder,
            min_level_wait: self.min_level_wait,
            retry_pause: self.retry_pause,
        }
    }

    /// Replaces the clock.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Locator<P, R, C2> {
        Locator {
            primitive: self.primitive,
            resources: self.resources,
            clock,
            ladder: self.ladder,
            min_level_wait: self.min_level_wait,
            retry_pause: self.retry_pause,
        }
    }

    /// Returns the matching primitive.
    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    /// Returns the clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns the ladder.
    pub fn ladder(&self) -> &SimilarityLadder {
        &self.ladder
    }

    /// Sets the default similarity level; see [`SimilarityLadder::set_default`].
    pub fn set_similarity(&mut self, value: f32) -> f32 {
        self.ladder.set_default(value)
    }

    /// Returns the default similarity level.
    pub fn similarity(&self) -> f32 {
        self.ladder.default_level()
    }
}

impl<P: MatchPrimitive, R: TemplateResources, C: Clock> Locator<P, R, C> {
    /// Searches for `template` for at most `timeout`.
    ///
    /// A zero timeout still issues the first fast probe.
    pub fn locate(&self, template: &Template, timeout: Duration) -> SearchOutcome {
        let _span = trace_span!("locate", template = %template).entered();
        if !self.check_resource(template) {
            return SearchOutcome::ResourceMissing;
        }

        let deadline = Deadline::after(self.clock.now(), timeout);
        let levels = self.ladder.levels();

        match self.fast_probe(template, &levels, Some(&deadline)) {
            Pass::Found(m) => return SearchOutcome::Found(m),
            Pass::TimedOut => {
                trace_event!(WARN, "timeout during fast probes", template = template);
                return SearchOutcome::NotFound;
            }
            Pass::Exhausted => {}
        }

        match self.bounded_wait(template, &levels, &deadline) {
            Pass::Found(m) => SearchOutcome::Found(m),
            Pass::TimedOut => {
                trace_event!(WARN, "timeout during bounded wait", template = template);
                SearchOutcome::NotFound
            }
            Pass::Exhausted => {
                trace_event!(
                    WARN,
                    "image not found at any similarity",
                    template = template,
                    timeout = timeout,
                    levels = levels
                );
                SearchOutcome::NotFound
            }
        }
    }

    /// Probes each level once, without waiting or a deadline.
    pub fn find(&self, template: &Template) -> SearchOutcome {
        if !self.check_resource(template) {
            return SearchOutcome::ResourceMissing;
        }
        let levels = self.ladder.levels();
        match self.fast_probe(template, &levels, None) {
            Pass::Found(m) => SearchOutcome::Found(m),
            Pass::Exhausted | Pass::TimedOut => {
                trace_event!(DEBUG, "image not visible", template = template, levels = levels);
                SearchOutcome::NotFound
            }
        }
    }

    /// Returns true when [`find`](Self::find) succeeds.
    pub fn exists(&self, template: &Template) -> bool {
        self.find(template).is_found()
    }

    fn check_resource(&self, template: &Template) -> bool {
        let available = self.resources.is_available(template);
        if !available {
            trace_event!(ERROR, "template image does not exist", template = template);
        }
        available
    }

    fn fast_probe(&self, template: &Template, levels: &[f32], deadline: Option<&Deadline>) -> Pass {
        for &level in levels {
            match self.primitive.probe(template, level) {
                Ok(Some(hit)) => {
                    trace_event!(
                        INFO,
                        "image found immediately",
                        template = template,
                        x = hit.region.x,
                        y = hit.region.y,
                        level = level
                    );
                    return Pass::Found(Match::new(hit, level, SearchPhase::Probe));
                }
                Ok(None) => {}
                Err(err) => trace_event!(DEBUG, "probe failed", level = level, err = err),
            }
            if deadline.is_some_and(|d| d.is_expired(self.clock.now())) {
                return Pass::TimedOut;
            }
        }
        Pass::Exhausted
    }

    fn bounded_wait(&self, template: &Template, levels: &[f32], deadline: &Deadline) -> Pass {
        let per_level = self.per_level_wait(deadline.remaining(self.clock.now()), levels.len());
        trace_event!(DEBUG, "fast probes failed, waiting", per_level = per_level);

        for &level in levels {
            if deadline.is_expired(self.clock.now()) {
                return Pass::TimedOut;
            }
            trace_event!(DEBUG, "waiting at level", level = level, wait = per_level);
            match self.primitive.poll_wait(template, level, per_level) {
                Ok(Some(hit)) => {
                    trace_event!(
                        INFO,
                        "image found",
                        template = template,
                        x = hit.region.x,
                        y = hit.region.y,
                        level = level
                    );
                    return Pass::Found(Match::new(hit, level, SearchPhase::Wait));
                }
                Ok(None) => {}
                Err(err) => trace_event!(DEBUG, "wait failed", level = level, err = err),
            }
        }
        Pass::Exhausted
    }

    /// Even share of `remaining` per level, floored at the minimum wait so
    /// every level gets at least one attempt.
    fn per_level_wait(&self, remaining: Duration, levels: usize) -> Duration {
        let share = remaining / levels.max(1) as u32;
        share.max(self.min_level_wait)
    }
}
