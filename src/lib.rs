//! Onsight locates on-screen targets by template matching and clicks them.
//!
//! The core is [`Locator`]: it searches a descending ladder of similarity
//! thresholds with fast probes first and bounded polling waits second, all
//! inside a caller-supplied timeout, and can retry whole search cycles. The
//! pixel work sits behind the [`MatchPrimitive`] trait;
//! [`CorrelationPrimitive`] is a ZNCC implementation over any
//! [`ScreenSource`], with optional row parallelism via the `rayon` feature.
//!
//! Optional features: `image-io` (load template files), `xcap` (live screen
//! capture), `enigo` (real pointer input), `tracing` (logging), `rayon`.

mod trace;

pub mod actions;
pub mod clock;
pub mod config;
pub mod image;
pub mod input;
pub mod kernel;
pub mod locate;
pub mod primitive;
pub mod screen;
pub mod template;
pub mod util;

pub use crate::actions::{ActionError, ActionGroup};
pub use crate::clock::{CancelToken, Clock, SystemClock};
pub use crate::config::{ActionSpec, AutomationConfig, LocatorConfig};
pub use crate::image::{ImageView, OwnedImage};
pub use crate::input::{NoopPointer, Point, Pointer};
pub use crate::locate::{
    ClickOutcome, Deadline, Locator, Match, SearchOutcome, SearchPhase, SimilarityLadder,
};
pub use crate::primitive::{CorrelationPrimitive, Hit, MatchPrimitive, PrimitiveConfig, Region};
pub use crate::screen::{ScreenSource, Screenshot, StaticScreen};
pub use crate::template::{FsResources, Template, TemplatePlan, TemplateResources};
pub use crate::util::{Cancelled, OnsightError, OnsightResult};

#[cfg(feature = "image-io")]
pub use crate::image::io;
#[cfg(feature = "enigo")]
pub use crate::input::EnigoPointer;
#[cfg(feature = "xcap")]
pub use crate::screen::XcapScreen;
