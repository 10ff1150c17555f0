#![allow(dead_code)]

use onsight::{
    Cancelled, Clock, Hit, LocatorConfig, Locator, MatchPrimitive, OnsightError, OnsightResult,
    Point, Pointer, Region, Template, TemplateResources,
};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Virtual time: only sleeps and scripted primitive calls move it forward.
#[derive(Clone)]
pub struct FakeClock(Rc<ClockState>);

pub struct ClockState {
    base: Instant,
    offset: Cell<Duration>,
    sleeps: RefCell<Vec<Duration>>,
    cancelled: Cell<bool>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self(Rc::new(ClockState {
            base: Instant::now(),
            offset: Cell::new(Duration::ZERO),
            sleeps: RefCell::new(Vec::new()),
            cancelled: Cell::new(false),
        }))
    }

    pub fn elapsed(&self) -> Duration {
        self.0.offset.get()
    }

    pub fn advance(&self, by: Duration) {
        self.0.offset.set(self.0.offset.get() + by);
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.0.sleeps.borrow().clone()
    }

    pub fn cancel(&self) {
        self.0.cancelled.set(true);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.0.base + self.0.offset.get()
    }

    fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
        self.0.sleeps.borrow_mut().push(duration);
        if self.0.cancelled.get() {
            return Err(Cancelled);
        }
        self.advance(duration);
        Ok(())
    }
}

/// How a template shows up on the scripted screen.
#[derive(Clone, Copy, Debug)]
pub struct Target {
    /// Highest similarity at which the template matches.
    pub confidence: f32,
    /// Virtual time at which the template becomes visible.
    pub appears_at: Duration,
    pub region: Region,
}

impl Target {
    pub fn visible(confidence: f32) -> Self {
        Self {
            confidence,
            appears_at: Duration::ZERO,
            region: Region {
                x: 100,
                y: 40,
                width: 20,
                height: 10,
            },
        }
    }

    pub fn appearing_at(mut self, at: Duration) -> Self {
        self.appears_at = at;
        self
    }
}

/// Matching primitive driven by a script and the fake clock.
pub struct ScriptedPrimitive {
    clock: FakeClock,
    targets: HashMap<Template, Target>,
    failing_levels: Vec<f32>,
    probe_cost: Duration,
    pub probes: RefCell<Vec<f32>>,
    pub waits: RefCell<Vec<(f32, Duration)>>,
}

impl ScriptedPrimitive {
    pub fn new(clock: &FakeClock) -> Self {
        Self {
            clock: clock.clone(),
            targets: HashMap::new(),
            failing_levels: Vec::new(),
            probe_cost: Duration::ZERO,
            probes: RefCell::new(Vec::new()),
            waits: RefCell::new(Vec::new()),
        }
    }

    pub fn with_target(mut self, template: &Template, target: Target) -> Self {
        self.targets.insert(template.clone(), target);
        self
    }

    /// Probes and waits at these levels return an error.
    pub fn failing_at(mut self, levels: &[f32]) -> Self {
        self.failing_levels = levels.to_vec();
        self
    }

    pub fn with_probe_cost(mut self, cost: Duration) -> Self {
        self.probe_cost = cost;
        self
    }

    pub fn calls(&self) -> usize {
        self.probes.borrow().len() + self.waits.borrow().len()
    }

    fn hit_at(&self, template: &Template, similarity: f32, at: Duration) -> Option<Hit> {
        let target = self.targets.get(template)?;
        (similarity <= target.confidence && at >= target.appears_at).then_some(Hit {
            region: target.region,
            score: target.confidence,
        })
    }

    fn transient(&self, similarity: f32) -> OnsightResult<()> {
        if self.failing_levels.contains(&similarity) {
            return Err(OnsightError::Capture {
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

impl MatchPrimitive for ScriptedPrimitive {
    fn probe(&self, template: &Template, similarity: f32) -> OnsightResult<Option<Hit>> {
        self.probes.borrow_mut().push(similarity);
        self.clock.advance(self.probe_cost);
        self.transient(similarity)?;
        Ok(self.hit_at(template, similarity, self.clock.elapsed()))
    }

    fn poll_wait(
        &self,
        template: &Template,
        similarity: f32,
        max_wait: Duration,
    ) -> OnsightResult<Option<Hit>> {
        self.waits.borrow_mut().push((similarity, max_wait));
        if let Err(err) = self.transient(similarity) {
            self.clock.advance(max_wait);
            return Err(err);
        }
        let now = self.clock.elapsed();
        let appears_at = match self.targets.get(template) {
            Some(target) if similarity <= target.confidence => target.appears_at,
            _ => {
                self.clock.advance(max_wait);
                return Ok(None);
            }
        };
        if appears_at <= now {
            return Ok(self.hit_at(template, similarity, now));
        }
        if appears_at <= now + max_wait {
            self.clock.advance(appears_at - now);
            return Ok(self.hit_at(template, similarity, appears_at));
        }
        self.clock.advance(max_wait);
        Ok(None)
    }
}

/// Resource check answering from a fixed set.
#[derive(Default)]
pub struct MemoryResources {
    available: HashSet<Template>,
    pub checks: Cell<usize>,
}

impl MemoryResources {
    pub fn with(templates: &[&Template]) -> Self {
        Self {
            available: templates.iter().map(|t| (*t).clone()).collect(),
            checks: Cell::new(0),
        }
    }
}

impl TemplateResources for MemoryResources {
    fn is_available(&self, template: &Template) -> bool {
        self.checks.set(self.checks.get() + 1);
        self.available.contains(template)
    }
}

/// Every template exists.
pub struct AllAvailable;

impl TemplateResources for AllAvailable {
    fn is_available(&self, _template: &Template) -> bool {
        true
    }
}

/// Records clicks, optionally failing every one.
#[derive(Default)]
pub struct RecordingPointer {
    pub clicks: RefCell<Vec<Point>>,
    fail: bool,
}

impl RecordingPointer {
    pub fn failing() -> Self {
        Self {
            clicks: RefCell::new(Vec::new()),
            fail: true,
        }
    }
}

impl Pointer for RecordingPointer {
    fn click(&self, at: Point) -> OnsightResult<()> {
        self.clicks.borrow_mut().push(at);
        if self.fail {
            return Err(OnsightError::Input {
                reason: "surface went away".to_string(),
            });
        }
        Ok(())
    }
}

/// Locator over a scripted primitive, in-memory resources, and virtual time.
pub fn scripted_locator<R: TemplateResources>(
    primitive: ScriptedPrimitive,
    resources: R,
    clock: &FakeClock,
) -> Locator<ScriptedPrimitive, R, FakeClock> {
    Locator::new(primitive, &LocatorConfig::default())
        .unwrap()
        .with_resources(resources)
        .with_clock(clock.clone())
}

pub fn secs(value: f32) -> Duration {
    Duration::from_secs_f32(value)
}
