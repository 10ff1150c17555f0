//! Configuration value objects.
//!
//! [`AutomationConfig`] is deserialized once at start-up (usually from JSON)
//! and passed by reference to whatever needs it. Durations are stored as
//! integer seconds or milliseconds so the file format stays plain JSON.

use crate::locate::{SimilarityLadder, DEFAULT_FALLBACK_LEVELS, FALLBACK_SIMILARITY};
use crate::primitive::PrimitiveConfig;
use crate::template::Template;
use crate::util::{OnsightError, OnsightResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for a [`Locator`](crate::locate::Locator).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Highest-priority similarity level.
    pub default_similarity: f32,
    /// Lower levels tried after the default.
    pub fallback_levels: Vec<f32>,
    /// Floor for the per-level wait in the bounded-wait phase.
    pub min_level_wait_ms: u64,
    /// Pause between whole search cycles in retry mode.
    pub retry_pause_ms: u64,
}

impl LocatorConfig {
    /// Validates the levels and builds the ladder.
    pub fn ladder(&self) -> OnsightResult<SimilarityLadder> {
        SimilarityLadder::new(self.default_similarity, self.fallback_levels.iter().copied())
    }

    /// Floor for the per-level wait.
    pub fn min_level_wait(&self) -> Duration {
        Duration::from_millis(self.min_level_wait_ms)
    }

    /// Pause between retry cycles.
    pub fn retry_pause(&self) -> Duration {
        Duration::from_millis(self.retry_pause_ms)
    }
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            default_similarity: FALLBACK_SIMILARITY,
            fallback_levels: DEFAULT_FALLBACK_LEVELS.to_vec(),
            min_level_wait_ms: 1_000,
            retry_pause_ms: 500,
        }
    }
}

/// Nominal screen size of the target machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    /// Width in desktop pixels.
    pub width: u32,
    /// Height in desktop pixels.
    pub height: u32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// One named high-level action: which template to click and how long to look.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Template image, relative to the assets directory unless absolute.
    pub template: PathBuf,
    /// Per-action timeout; the global default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Number of whole search cycles; a single cycle when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
}

/// Process-wide automation settings and the action-to-template map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Directory that relative template paths resolve against.
    pub assets_dir: PathBuf,
    /// Ladder and timing for the locator.
    pub locator: LocatorConfig,
    /// Timeout for actions without their own.
    pub default_timeout_secs: u64,
    /// Settle time between consecutive actions in a sequence.
    pub inter_action_delay_ms: u64,
    /// Pause between captures while the primitive polls.
    pub poll_interval_ms: u64,
    /// Nominal screen size; informational only.
    pub screen: ScreenSize,
    /// Named actions, keyed by name.
    pub actions: BTreeMap<String, ActionSpec>,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            locator: LocatorConfig::default(),
            default_timeout_secs: 10,
            inter_action_delay_ms: 500,
            poll_interval_ms: 200,
            screen: ScreenSize::default(),
            actions: BTreeMap::new(),
        }
    }
}

impl AutomationConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(text: &str) -> OnsightResult<Self> {
        let config: Self = serde_json::from_str(text).map_err(|err| OnsightError::ConfigLoad {
            path: "<inline>".to_string(),
            reason: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON file.
    pub fn load(path: impl AsRef<Path>) -> OnsightResult<Self> {
        let path = path.as_ref();
        let load_err = |reason: String| OnsightError::ConfigLoad {
            path: path.display().to_string(),
            reason,
        };
        let text = fs::read_to_string(path).map_err(|err| load_err(err.to_string()))?;
        let config: Self = serde_json::from_str(&text).map_err(|err| load_err(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants serde cannot express.
    pub fn validate(&self) -> OnsightResult<()> {
        self.locator.ladder()?;
        if self.locator.min_level_wait_ms == 0 {
            return Err(invalid("locator.min_level_wait_ms must be positive"));
        }
        if self.default_timeout_secs == 0 {
            return Err(invalid("default_timeout_secs must be positive"));
        }
        for (name, spec) in &self.actions {
            if spec.template.as_os_str().is_empty() {
                return Err(invalid(format!("action `{name}` has an empty template path")));
            }
            if spec.timeout_secs == Some(0) {
                return Err(invalid(format!("action `{name}` has a zero timeout")));
            }
            if spec.retries == Some(0) {
                return Err(invalid(format!("action `{name}` has zero retries")));
            }
        }
        Ok(())
    }

    /// Returns true when the assets directory exists.
    pub fn assets_dir_exists(&self) -> bool {
        self.assets_dir.is_dir()
    }

    /// Looks up an action by name.
    pub fn action(&self, name: &str) -> Option<&ActionSpec> {
        self.actions.get(name)
    }

    /// Resolves an action's template against the assets directory.
    pub fn template_for(&self, spec: &ActionSpec) -> Template {
        Template::new(self.assets_dir.join(&spec.template))
    }

    /// Timeout for an action, falling back to the global default.
    pub fn timeout_for(&self, spec: &ActionSpec) -> Duration {
        Duration::from_secs(spec.timeout_secs.unwrap_or(self.default_timeout_secs))
    }

    /// Global default timeout.
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }

    /// Settle time between consecutive actions in a sequence.
    pub fn inter_action_delay(&self) -> Duration {
        Duration::from_millis(self.inter_action_delay_ms)
    }

    /// Tuning for the bundled correlation primitive.
    pub fn primitive_config(&self) -> PrimitiveConfig {
        PrimitiveConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            ..PrimitiveConfig::default()
        }
    }
}

fn invalid(reason: impl Into<String>) -> OnsightError {
    OnsightError::InvalidConfig {
        reason: reason.into(),
    }
}
