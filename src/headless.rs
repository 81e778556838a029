use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::{
    engine::{Skimmer, Wake},
    surface::Surface,
};

/// Frame clock standing in for a display refresh signal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameClock {
    pub frame_interval: Duration,
}

impl FrameClock {
    /// Non-finite or non-positive rates fall back to 60 fps. The interval is
    /// never shorter than a nanosecond and saturates for vanishing rates.
    pub fn from_fps(fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 60.0 };
        let interval = Duration::try_from_secs_f64(1.0 / fps).unwrap_or(Duration::MAX);
        Self {
            frame_interval: interval.max(Duration::from_nanos(1)),
        }
    }

    /// Drives a mounted engine from `start` until `until` or until it goes
    /// idle, honouring its timers and frame requests. Stops early if the
    /// engine asks to be pumped again without time moving forward. Returns
    /// the time of the last pump.
    pub fn run<R: Rng>(
        &self,
        engine: &mut Skimmer<R>,
        surface: &mut dyn Surface,
        start: Duration,
        until: Duration,
    ) -> Duration {
        let mut now = start;
        let mut wake = engine.wake();
        let mut pumped = false;
        loop {
            let next = match wake {
                Wake::Idle => break,
                Wake::Frame => now.saturating_add(self.frame_interval),
                Wake::Timer(due) => due.max(now),
            };
            if next > until {
                break;
            }
            if pumped && next <= now {
                warn!(now_ms = now.as_millis() as u64, "engine stalled, stopping frame clock");
                break;
            }
            now = next;
            wake = engine.pump(now, surface);
            pumped = true;
        }
        now
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::from_fps(60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::Phase,
        settings::{Activation, EngineSettings, Tuning},
        surface::{Geometry, HeadlessSurface},
    };

    #[test]
    fn runs_several_full_cycles() {
        let mut engine = Skimmer::new(EngineSettings {
            activation: Activation::opted_in(),
            seed: Some(21),
            ..EngineSettings::default()
        });
        let mut surface = HeadlessSurface::new(Geometry::new(1024.0, 480.0, 2.0));
        engine.mount(Duration::ZERO);
        let clock = FrameClock::from_fps(30.0);
        clock.run(&mut engine, &mut surface, Duration::ZERO, Duration::from_secs(120));

        let stats = engine.stats();
        assert!(stats.sweeps_completed >= 4, "{stats:?}");
        assert!(stats.sweeps_started >= stats.sweeps_completed);
        assert!(stats.specks_spawned > 0);
        assert!(stats.specks_captured > 0);
        assert_eq!(surface.backing, Some((2048, 960)));
        assert_ne!(engine.phase(), Phase::Unmounted);
    }

    #[test]
    fn degenerate_rates_keep_a_positive_interval() {
        let default = FrameClock::default().frame_interval;
        assert_eq!(FrameClock::from_fps(f64::INFINITY).frame_interval, default);
        assert_eq!(FrameClock::from_fps(f64::NAN).frame_interval, default);
        assert_eq!(FrameClock::from_fps(-5.0).frame_interval, default);
        assert_eq!(FrameClock::from_fps(1e12).frame_interval, Duration::from_nanos(1));
        assert_eq!(FrameClock::from_fps(1e-300).frame_interval, Duration::MAX);
    }

    #[test]
    fn zero_backoff_does_not_stall_the_clock() {
        let mut engine = Skimmer::new(EngineSettings {
            activation: Activation::opted_in(),
            tuning: Tuning {
                retry_backoff_ms: 0,
                ..Tuning::default()
            },
            seed: Some(3),
        });
        let mut surface = HeadlessSurface::new(Geometry::new(0.0, 400.0, 1.0));
        engine.mount(Duration::ZERO);
        let end = FrameClock::default().run(
            &mut engine,
            &mut surface,
            Duration::ZERO,
            Duration::from_secs(5),
        );
        assert_eq!(end, Duration::from_secs(2));
        assert_eq!(engine.stats().readiness_retries, 1);
        assert_eq!(engine.stats().sweeps_started, 0);
    }

    #[test]
    fn idle_engine_returns_immediately() {
        let mut engine = Skimmer::new(EngineSettings::default());
        let mut surface = HeadlessSurface::default();
        let end = FrameClock::default().run(
            &mut engine,
            &mut surface,
            Duration::from_secs(1),
            Duration::from_secs(100),
        );
        assert_eq!(end, Duration::from_secs(1));
        assert_eq!(surface.clears, 0);
    }
}
