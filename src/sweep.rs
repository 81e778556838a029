use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use crate::{
    config::{Direction, SweepConfig},
    settings::Tuning,
    speck::{Speck, spawn_ahead},
    surface::{Geometry, Surface},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct StepReport {
    pub progress: f32,
    pub line_x: f32,
    pub spawned: usize,
    pub captured: usize,
    pub removed: usize,
}

/// Line x for a given progress. Progress 0 sits just off the starting edge and
/// progress 1 is `overscan` past the opposite one.
pub fn line_position(direction: Direction, progress: f32, width: f32, overscan: f32) -> f32 {
    let travel = (width + overscan) as f64 * progress as f64;
    match direction {
        Direction::LeftToRight => (-1.0 + travel) as f32,
        Direction::RightToLeft => (width as f64 + 1.0 - travel) as f32,
    }
}

/// Run state of a single sweep.
#[derive(Clone, Debug)]
pub struct Sweep {
    config: SweepConfig,
    started_at: Duration,
    line_x: f32,
    progress: f32,
    specks: Vec<Speck>,
}

impl Sweep {
    /// Starts a sweep at `now` with the line just off its starting edge.
    pub fn begin(config: SweepConfig, now: Duration, geometry: Geometry, tuning: &Tuning) -> Self {
        let line_x = line_position(config.direction, 0.0, geometry.width, tuning.overscan);
        Self {
            config,
            started_at: now,
            line_x,
            progress: 0.0,
            specks: Vec::new(),
        }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    pub fn line_x(&self) -> f32 {
        self.line_x
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn specks(&self) -> &[Speck] {
        &self.specks
    }

    pub fn progress_at(&self, now: Duration) -> f32 {
        let duration = self.config.duration.as_secs_f64();
        if duration <= 0.0 {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at).as_secs_f64();
        (elapsed / duration).clamp(0.0, 1.0) as f32
    }

    /// Advances the simulation to `now`: moves the line, spawns, drifts,
    /// captures, fades and culls specks.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        now: Duration,
        geometry: Geometry,
        tuning: &Tuning,
        rng: &mut R,
    ) -> StepReport {
        let progress = self.progress_at(now);
        let line_x = line_position(self.config.direction, progress, geometry.width, tuning.overscan);
        self.progress = progress;
        self.line_x = line_x;

        let mut report = StepReport {
            progress,
            line_x,
            ..StepReport::default()
        };

        if progress < tuning.spawn_cutoff {
            report.spawned = spawn_ahead(rng, &self.config, line_x, geometry, tuning, &mut self.specks);
        }

        let ride_threshold = geometry.width * tuning.ride_fraction;
        let instant = self.config.sweep_type.captures_instantly();
        for speck in &mut self.specks {
            if !speck.is_captured() && self.config.drift {
                speck.drift(geometry.height);
            }
            if speck.try_capture(line_x, self.config.direction, instant) {
                report.captured += 1;
            }
            speck.ride(line_x, ride_threshold, tuning.fade_distance);
        }

        let before = self.specks.len();
        self.specks.retain(|s| s.is_visible(geometry, tuning));
        report.removed = before - self.specks.len();

        report
    }

    /// Draws every speck with its opacity scaled by `alpha_scale`.
    pub fn draw(&self, surface: &mut dyn Surface, alpha_scale: f32) {
        for s in &self.specks {
            let alpha = (s.opacity * alpha_scale).clamp(0.0, 1.0);
            surface.fill_square(s.position.x, s.position.y, s.size, s.color, alpha);
        }
    }
}
