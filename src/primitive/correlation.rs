//! ZNCC-based primitive over a [`ScreenSource`].

use super::{Hit, MatchPrimitive};
use crate::image::{ImageView, OwnedImage};
use crate::kernel::{Peak, ScanParams};
use crate::screen::ScreenSource;
use crate::template::{Template, TemplatePlan};
use crate::trace::trace_event;
use crate::util::OnsightResult;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

/// Tuning for [`CorrelationPrimitive`].
#[derive(Clone, Copy, Debug)]
pub struct PrimitiveConfig {
    /// Pause between captures inside [`MatchPrimitive::poll_wait`].
    pub poll_interval: Duration,
    /// Kernel parameters.
    pub scan: ScanParams,
    /// Use the row-parallel scan when the `rayon` feature is enabled.
    pub parallel: bool,
}

impl Default for PrimitiveConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(200),
            scan: ScanParams::default(),
            parallel: false,
        }
    }
}

/// Captures the screen and scores the template with ZNCC.
///
/// Template plans are built once per template and cached for the lifetime of
/// the primitive. Templates are loaded from disk (feature `image-io`) unless
/// they were registered up front with [`register`](Self::register).
pub struct CorrelationPrimitive<S> {
    screen: S,
    config: PrimitiveConfig,
    plans: RefCell<HashMap<Template, Rc<TemplatePlan>>>,
}

impl<S: ScreenSource> CorrelationPrimitive<S> {
    /// Creates a primitive with default tuning.
    pub fn new(screen: S) -> Self {
        Self {
            screen,
            config: PrimitiveConfig::default(),
            plans: RefCell::new(HashMap::new()),
        }
    }

    /// Replaces the tuning.
    pub fn with_config(mut self, config: PrimitiveConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the capture source.
    pub fn screen(&self) -> &S {
        &self.screen
    }

    /// Associates `image` with `template`, bypassing file loading.
    pub fn register(&self, template: Template, image: &OwnedImage) -> OnsightResult<()> {
        let plan = TemplatePlan::from_view(image.view())?;
        self.plans.borrow_mut().insert(template, Rc::new(plan));
        Ok(())
    }

    fn plan(&self, template: &Template) -> OnsightResult<Rc<TemplatePlan>> {
        if let Some(plan) = self.plans.borrow().get(template) {
            return Ok(Rc::clone(plan));
        }
        let plan = Rc::new(load_plan(template)?);
        self.plans
            .borrow_mut()
            .insert(template.clone(), Rc::clone(&plan));
        Ok(plan)
    }

    fn scan(&self, image: ImageView<'_, u8>, plan: &TemplatePlan) -> OnsightResult<Option<Peak>> {
        #[cfg(feature = "rayon")]
        if self.config.parallel {
            return crate::kernel::rayon::best_match_par(image, plan, self.config.scan);
        }
        crate::kernel::scalar::best_match(image, plan, self.config.scan)
    }
}

impl<S: ScreenSource> MatchPrimitive for CorrelationPrimitive<S> {
    fn probe(&self, template: &Template, similarity: f32) -> OnsightResult<Option<Hit>> {
        let plan = self.plan(template)?;
        let shot = self.screen.capture()?;
        let Some(peak) = self.scan(shot.image.view(), &plan)? else {
            return Ok(None);
        };
        trace_event!(
            TRACE,
            "best placement",
            template = template,
            score = peak.score,
            similarity = similarity
        );
        if peak.score < similarity {
            return Ok(None);
        }
        Ok(Some(Hit {
            region: shot.desktop_region(peak.x, peak.y, plan.width(), plan.height()),
            score: peak.score,
        }))
    }

    fn poll_wait(
        &self,
        template: &Template,
        similarity: f32,
        max_wait: Duration,
    ) -> OnsightResult<Option<Hit>> {
        let started = Instant::now();
        loop {
            let attempt = self.probe(template, similarity);
            let elapsed = started.elapsed();
            match attempt {
                Ok(Some(hit)) => return Ok(Some(hit)),
                Ok(None) => {}
                Err(err) if elapsed >= max_wait => return Err(err),
                Err(err) => trace_event!(DEBUG, "probe failed while waiting", err = err),
            }
            if elapsed >= max_wait {
                return Ok(None);
            }
            thread::sleep(self.config.poll_interval.min(max_wait - elapsed));
        }
    }
}

#[cfg(feature = "image-io")]
fn load_plan(template: &Template) -> OnsightResult<TemplatePlan> {
    let image = crate::image::io::load_gray_image(template.path())?;
    TemplatePlan::from_view(image.view())
}

#[cfg(not(feature = "image-io"))]
fn load_plan(template: &Template) -> OnsightResult<TemplatePlan> {
    Err(crate::util::OnsightError::ImageIo {
        reason: format!(
            "{template} is not registered and the image-io feature is disabled"
        ),
    })
}
