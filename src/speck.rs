use cgmath::{Vector2, vec2};
use rand::Rng;

use crate::{
    color::{Rgb, speck_color},
    config::{Direction, SweepConfig},
    settings::Tuning,
    surface::Geometry,
};

const DRIFT_VX: (f32, f32) = (-0.5, 0.5);
const DRIFT_VY: (f32, f32) = (0.0, 0.3);
const WEIGHT: (f32, f32) = (0.5, 1.5);
const FALL_ACCEL: f32 = 0.01;
const MAX_FALL: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Speck {
    pub position: Vector2<f32>,
    pub velocity: Vector2<f32>,
    pub weight: f32,
    pub size: f32,
    pub opacity: f32,
    /// Opacity assigned at spawn; the fade never exceeds it.
    pub spawn_opacity: f32,
    pub color: Rgb,
    pub captured_at: Option<f32>,
    pub fade_start: Option<f32>,
}

impl Speck {
    pub fn new(position: Vector2<f32>, size: f32, opacity: f32, color: Rgb) -> Self {
        Self {
            position,
            velocity: vec2(0.0, 0.0),
            weight: 1.0,
            size,
            opacity,
            spawn_opacity: opacity,
            color,
            captured_at: None,
            fade_start: None,
        }
    }

    pub fn is_captured(&self) -> bool {
        self.captured_at.is_some()
    }

    pub fn is_fading(&self) -> bool {
        self.fade_start.is_some()
    }

    /// Free fall with a slowly growing downward velocity; only before capture.
    pub fn drift(&mut self, height: f32) {
        self.position.x += self.velocity.x;
        if self.velocity.y != 0.0 {
            self.position.y += self.velocity.y * self.weight;
            self.velocity.y = (self.velocity.y + FALL_ACCEL).min(MAX_FALL);
        }
        self.position.y = self.position.y.clamp(0.0, height.max(0.0));
    }

    /// Returns true on the tick the speck gets captured.
    pub fn try_capture(&mut self, line_x: f32, direction: Direction, instant: bool) -> bool {
        if self.is_captured() {
            return false;
        }
        let swept = match direction {
            Direction::LeftToRight => self.position.x <= line_x,
            Direction::RightToLeft => self.position.x >= line_x,
        };
        if !swept {
            return false;
        }
        self.captured_at = Some(line_x);
        if instant {
            self.fade_start = Some(line_x);
        }
        true
    }

    /// Pins a captured speck to the line and applies the distance-based fade.
    pub fn ride(&mut self, line_x: f32, ride_threshold: f32, fade_distance: f32) {
        let Some(captured_at) = self.captured_at else {
            return;
        };
        self.position.x = line_x;

        if self.fade_start.is_none() && (line_x - captured_at).abs() > ride_threshold {
            self.fade_start = Some(line_x);
        }
        if let Some(fade_start) = self.fade_start {
            let faded = (line_x - fade_start).abs() / fade_distance;
            let next = self.spawn_opacity * (1.0 - faded).clamp(0.0, 1.0);
            self.opacity = next.min(self.opacity);
        }
    }

    pub fn is_visible(&self, geometry: Geometry, tuning: &Tuning) -> bool {
        self.opacity > tuning.removal_opacity
            && self.position.x > -tuning.cull_tolerance
            && self.position.x < geometry.width + tuning.cull_tolerance
            && self.position.y >= 0.0
            && self.position.y <= geometry.height
    }
}

/// Whether the line is far enough from the edge it is heading to for spawning.
pub fn line_in_spawn_bounds(line_x: f32, width: f32, direction: Direction, guard: f32) -> bool {
    match direction {
        Direction::LeftToRight => line_x >= 0.0 && line_x < width - guard,
        Direction::RightToLeft => line_x > guard && line_x <= width,
    }
}

/// One spawn attempt ahead of the line. Appends accepted specks to `out` and
/// returns how many were added.
pub fn spawn_ahead<R: Rng + ?Sized>(
    rng: &mut R,
    config: &SweepConfig,
    line_x: f32,
    geometry: Geometry,
    tuning: &Tuning,
    out: &mut Vec<Speck>,
) -> usize {
    let in_bounds = line_in_spawn_bounds(line_x, geometry.width, config.direction, tuning.spawn_guard);
    if !rng.gen_bool(config.spawn_rate.clamp(0.0, 1.0)) || !in_bounds {
        return 0;
    }

    let count = config.specks_per_spawn(rng);
    let lane = (tuning.edge_margin, geometry.height - tuning.edge_margin);
    let mut added = 0;

    for _ in 0..count {
        let size = config.speck_size.sample(rng);
        let opacity = config.speck_opacity.sample(rng);
        let ahead = config.spawn_ahead.sample(rng);
        let x = line_x + config.direction.sign() * ahead;
        let y = if lane.1 > lane.0 {
            rng.gen_range(lane.0..lane.1)
        } else {
            geometry.height * 0.5
        };
        let color = speck_color(rng, config.color_variation);

        let mut speck = Speck::new(vec2(x, y), size, opacity, color);
        if config.drift {
            speck.weight = rng.gen_range(WEIGHT.0..WEIGHT.1);
            speck.velocity = vec2(
                rng.gen_range(DRIFT_VX.0..DRIFT_VX.1),
                rng.gen_range(DRIFT_VY.0..DRIFT_VY.1),
            );
        }

        let band = config.spawn_ahead.max;
        if speck.position.x >= -band && speck.position.x < geometry.width + band {
            out.push(speck);
            added += 1;
        }
    }

    added
}
