use std::time::Duration;

use rand::Rng;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SweepType {
    QuickLight,
    Thorough,
    Standard,
    PowerWash,
    Gentle,
}

impl SweepType {
    pub const ALL: [SweepType; 5] = [
        SweepType::QuickLight,
        SweepType::Thorough,
        SweepType::Standard,
        SweepType::PowerWash,
        SweepType::Gentle,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SweepType::QuickLight => "quick-light",
            SweepType::Thorough => "thorough",
            SweepType::Standard => "standard",
            SweepType::PowerWash => "power-wash",
            SweepType::Gentle => "gentle",
        }
    }

    /// Power wash pins the fade start at capture, so specks never ride.
    pub fn captures_instantly(self) -> bool {
        self == SweepType::PowerWash
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

impl Direction {
    /// +1 when the line moves towards larger x.
    pub fn sign(self) -> f32 {
        match self {
            Direction::LeftToRight => 1.0,
            Direction::RightToLeft => -1.0,
        }
    }
}

/// Closed float interval sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..self.max)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LineStyle {
    pub width: f32,
    pub opacity: f32,
    pub glow: f32,
}

/// One sweep's parameters; regenerated for every sweep and never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SweepConfig {
    pub sweep_type: SweepType,
    pub direction: Direction,
    pub duration: Duration,
    pub pause_after: Duration,
    pub spawn_rate: f64,
    pub specks_per_spawn_min: u32,
    pub specks_per_spawn_max: u32,
    pub speck_size: Span,
    pub speck_opacity: Span,
    pub spawn_ahead: Span,
    pub line: LineStyle,
    pub drift: bool,
    pub color_variation: bool,
}

fn millis<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> Duration {
    Duration::from_secs_f64(rng.gen_range(min..max) / 1000.0)
}

impl SweepConfig {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let sweep_type = SweepType::ALL[rng.gen_range(0..SweepType::ALL.len())];

        let mut config = SweepConfig {
            sweep_type,
            direction: Direction::LeftToRight,
            duration: millis(rng, 6000.0, 14_000.0),
            pause_after: millis(rng, 3000.0, 10_000.0),
            spawn_rate: rng.gen_range(0.6..0.95),
            specks_per_spawn_min: 1,
            specks_per_spawn_max: 10,
            speck_size: Span::new(1.0, 7.0),
            speck_opacity: Span::new(0.5, 1.0),
            spawn_ahead: Span::new(rng.gen_range(20.0..50.0), rng.gen_range(80.0..150.0)),
            line: LineStyle {
                width: rng.gen_range(2.0..5.0),
                opacity: rng.gen_range(0.3..0.7),
                glow: rng.gen_range(0.3..0.6),
            },
            drift: rng.gen_bool(0.7),
            color_variation: rng.gen_bool(0.6),
        };
        if rng.gen_bool(0.2) {
            config.direction = Direction::RightToLeft;
        }

        match sweep_type {
            SweepType::QuickLight => {
                config.duration = millis(rng, 6000.0, 8000.0);
                config.specks_per_spawn_min = 1;
                config.specks_per_spawn_max = 4;
                config.speck_size = Span::new(1.0, 3.0);
                config.line.width = rng.gen_range(2.0..3.0);
                config.spawn_rate = rng.gen_range(0.4..0.6);
            }
            SweepType::Thorough => {
                config.duration = millis(rng, 12_000.0, 14_000.0);
                config.specks_per_spawn_min = 5;
                config.specks_per_spawn_max = 10;
                config.speck_size = Span::new(3.0, 7.0);
                config.line.width = rng.gen_range(4.0..5.0);
                config.line.opacity = rng.gen_range(0.5..0.7);
                config.spawn_rate = rng.gen_range(0.8..0.95);
            }
            SweepType::PowerWash => {
                config.duration = millis(rng, 6000.0, 9000.0);
                config.line = LineStyle {
                    width: 5.0,
                    opacity: 0.7,
                    glow: 0.6,
                };
                config.drift = false;
            }
            SweepType::Gentle => {
                config.duration = millis(rng, 10_000.0, 12_000.0);
                config.specks_per_spawn_min = 1;
                config.specks_per_spawn_max = 5;
                config.speck_size = Span::new(1.0, 4.0);
                config.line.width = 2.0;
                config.line.opacity = rng.gen_range(0.3..0.4);
                config.drift = true;
            }
            SweepType::Standard => {}
        }

        config
    }

    pub fn specks_per_spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let max = self.specks_per_spawn_max.max(self.specks_per_spawn_min);
        rng.gen_range(self.specks_per_spawn_min..=max)
    }
}
