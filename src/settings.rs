use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::{SkimmerError, SkimmerResult};

/// Host-resolved switches, read once at mount. The effect is opt-in, so the
/// default is disabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activation {
    pub enabled: bool,
    pub reduced_motion: bool,
}

impl Activation {
    pub fn opted_in() -> Self {
        Self {
            enabled: true,
            reduced_motion: false,
        }
    }

    pub fn is_eligible(self) -> bool {
        self.enabled && !self.reduced_motion
    }
}

/// Empirically tuned visual constants. Distances are CSS pixels, times milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub initial_delay_ms: u64,
    pub retry_backoff_ms: u64,
    pub fallback_pause_min_ms: u64,
    pub fallback_pause_max_ms: u64,
    /// Share of the container width a captured speck rides before fading.
    pub ride_fraction: f32,
    pub fade_distance: f32,
    pub cull_tolerance: f32,
    pub overscan: f32,
    pub edge_margin: f32,
    /// Distance from the far edge at which spawning stops.
    pub spawn_guard: f32,
    /// Progress after which no more specks are spawned.
    pub spawn_cutoff: f32,
    pub fade_out_step: f32,
    pub removal_opacity: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_delay_ms: 2000,
            retry_backoff_ms: 100,
            fallback_pause_min_ms: 3000,
            fallback_pause_max_ms: 10_000,
            ride_fraction: 0.08,
            fade_distance: 20.0,
            cull_tolerance: 10.0,
            overscan: 200.0,
            edge_margin: 40.0,
            spawn_guard: 100.0,
            spawn_cutoff: 0.9,
            fade_out_step: 0.05,
            removal_opacity: 0.01,
        }
    }
}

impl Tuning {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn validate(&self) -> SkimmerResult<()> {
        if self.retry_backoff_ms == 0 {
            return Err(SkimmerError::settings("retry_backoff_ms must be > 0"));
        }
        if self.fallback_pause_min_ms > self.fallback_pause_max_ms {
            return Err(SkimmerError::settings(
                "fallback pause min must not exceed max",
            ));
        }
        if !(self.ride_fraction >= 0.0) {
            return Err(SkimmerError::settings("ride_fraction must be >= 0"));
        }
        if !(self.fade_distance > 0.0) {
            return Err(SkimmerError::settings("fade_distance must be > 0"));
        }
        if !(self.fade_out_step > 0.0 && self.fade_out_step <= 1.0) {
            return Err(SkimmerError::settings("fade_out_step must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.spawn_cutoff) {
            return Err(SkimmerError::settings("spawn_cutoff must be in [0, 1]"));
        }
        if self.overscan < 0.0 || self.cull_tolerance < 0.0 || self.edge_margin < 0.0 {
            return Err(SkimmerError::settings(
                "overscan, cull_tolerance and edge_margin must be >= 0",
            ));
        }
        Ok(())
    }
}

/// Everything the engine needs from its host, injected at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub activation: Activation,
    pub tuning: Tuning,
    /// Fixed seed for reproducible sweeps; entropy when absent.
    pub seed: Option<u64>,
}

impl EngineSettings {
    pub fn from_json_str(json: &str) -> SkimmerResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.tuning.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> SkimmerResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
