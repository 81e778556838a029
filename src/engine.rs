use std::time::Duration;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::SweepConfig,
    settings::EngineSettings,
    surface::{Geometry, Surface},
    sweep::Sweep,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaitReason {
    InitialDelay,
    Retry,
    Pause,
}

/// What the host has to schedule after an engine call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wake {
    /// Nothing pending.
    Idle,
    /// Call `pump` once the clock reaches the deadline.
    Timer(Duration),
    /// Call `pump` on the next display refresh.
    Frame,
}

/// Read-only view of the scheduler state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Unmounted,
    /// Mounted but disabled by activation or reduced motion.
    Inactive,
    Waiting { due: Duration, reason: WaitReason },
    Sweeping { progress: f32 },
    FadingOut { multiplier: f32 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub sweeps_started: u64,
    pub sweeps_completed: u64,
    pub specks_spawned: u64,
    pub specks_captured: u64,
    pub readiness_retries: u64,
    pub frames: u64,
}

enum State {
    Unmounted,
    Inactive,
    Waiting { due: Duration, reason: WaitReason },
    Sweeping(Sweep),
    FadingOut { sweep: Sweep, multiplier: f32 },
}

fn ready_geometry(surface: &dyn Surface) -> Option<Geometry> {
    surface.geometry().filter(Geometry::has_area)
}

/// The sweep scheduler. Single-threaded and host-driven: every call takes the
/// current time and answers with the next [`Wake`].
pub struct Skimmer<R = StdRng> {
    settings: EngineSettings,
    rng: R,
    state: State,
    visible: bool,
    stats: EngineStats,
}

impl Skimmer<StdRng> {
    pub fn new(settings: EngineSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(settings, rng)
    }
}

impl<R: Rng> Skimmer<R> {
    pub fn with_rng(settings: EngineSettings, rng: R) -> Self {
        Self {
            settings,
            rng,
            state: State::Unmounted,
            visible: true,
            stats: EngineStats::default(),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn sweep(&self) -> Option<&Sweep> {
        match &self.state {
            State::Sweeping(sweep) | State::FadingOut { sweep, .. } => Some(sweep),
            _ => None,
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.state {
            State::Unmounted => Phase::Unmounted,
            State::Inactive => Phase::Inactive,
            State::Waiting { due, reason } => Phase::Waiting {
                due: *due,
                reason: *reason,
            },
            State::Sweeping(sweep) => Phase::Sweeping {
                progress: sweep.progress(),
            },
            State::FadingOut { multiplier, .. } => Phase::FadingOut {
                multiplier: *multiplier,
            },
        }
    }

    pub fn wake(&self) -> Wake {
        match self.state {
            State::Waiting { due, .. } => Wake::Timer(due),
            State::Sweeping(_) | State::FadingOut { .. } if self.visible => Wake::Frame,
            _ => Wake::Idle,
        }
    }

    /// Resolves eligibility once and arms the initial delay. Mounting an
    /// already mounted engine changes nothing.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn mount(&mut self, now: Duration) -> Wake {
        if !matches!(self.state, State::Unmounted) {
            return self.wake();
        }
        self.visible = true;

        let activation = self.settings.activation;
        if !activation.is_eligible() {
            debug!(
                enabled = activation.enabled,
                reduced_motion = activation.reduced_motion,
                "skimmer disabled"
            );
            self.state = State::Inactive;
            return Wake::Idle;
        }

        debug!("scheduling initial sweep");
        self.state = State::Waiting {
            due: now + self.settings.tuning.initial_delay(),
            reason: WaitReason::InitialDelay,
        };
        self.wake()
    }

    /// Cancels the pending timer and frame and drops the sweep. Idempotent.
    pub fn unmount(&mut self) {
        if !matches!(self.state, State::Unmounted) {
            debug!("skimmer unmounted");
        }
        self.state = State::Unmounted;
    }

    /// Runs whatever is due at `now`: a timer whose deadline passed, or one
    /// animation frame.
    pub fn pump(&mut self, now: Duration, surface: &mut dyn Surface) -> Wake {
        let state = std::mem::replace(&mut self.state, State::Unmounted);
        self.state = match state {
            State::Waiting { due, .. } if now >= due => self.start_sweep(now, surface),
            State::Sweeping(sweep) if self.visible => self.sweep_frame(sweep, now, surface),
            State::FadingOut { sweep, multiplier } if self.visible => {
                self.fade_frame(sweep, multiplier, now, surface)
            }
            other => other,
        };
        self.wake()
    }

    /// Hidden hosts get no frames; sweep state and timer deadlines are kept.
    pub fn set_visible(&mut self, visible: bool) -> Wake {
        if self.visible != visible {
            debug!(visible, "visibility changed");
        }
        self.visible = visible;
        self.wake()
    }

    /// Re-sizes the drawing buffer while a sweep is running.
    pub fn resize(&mut self, surface: &mut dyn Surface) {
        if !matches!(self.state, State::Sweeping(_)) {
            return;
        }
        let Some(geometry) = ready_geometry(surface) else {
            return;
        };
        if let Err(err) = surface.configure(geometry) {
            debug!(%err, "resize reconfigure failed");
        }
    }

    fn retry(&mut self, now: Duration) -> State {
        self.stats.readiness_retries += 1;
        State::Waiting {
            due: now + self.settings.tuning.retry_backoff(),
            reason: WaitReason::Retry,
        }
    }

    #[tracing::instrument(level = "debug", skip(self, surface))]
    fn start_sweep(&mut self, now: Duration, surface: &mut dyn Surface) -> State {
        let Some(geometry) = ready_geometry(surface) else {
            warn!("container not ready, retrying");
            return self.retry(now);
        };
        if let Err(err) = surface.configure(geometry) {
            warn!(%err, "canvas init failed, retrying");
            return self.retry(now);
        }

        let config = SweepConfig::generate(&mut self.rng);
        info!(
            sweep_type = config.sweep_type.label(),
            duration_ms = config.duration.as_millis() as u64,
            direction = ?config.direction,
            line_width = config.line.width,
            "starting sweep"
        );

        let sweep = Sweep::begin(config, now, geometry, &self.settings.tuning);
        surface.show_line(sweep.line_x(), sweep.config().line);
        self.stats.sweeps_started += 1;

        if self.visible {
            self.sweep_frame(sweep, now, surface)
        } else {
            State::Sweeping(sweep)
        }
    }

    fn sweep_frame(&mut self, mut sweep: Sweep, now: Duration, surface: &mut dyn Surface) -> State {
        let Some(geometry) = ready_geometry(surface) else {
            return State::Sweeping(sweep);
        };

        let report = sweep.step(now, geometry, &self.settings.tuning, &mut self.rng);
        self.stats.frames += 1;
        self.stats.specks_spawned += report.spawned as u64;
        self.stats.specks_captured += report.captured as u64;

        surface.clear();
        sweep.draw(surface, 1.0);
        surface.show_line(report.line_x, sweep.config().line);

        if report.progress < 1.0 {
            return State::Sweeping(sweep);
        }

        debug!(remaining = sweep.specks().len(), "ending sweep");
        self.stats.sweeps_completed += 1;
        self.fade_frame(sweep, 1.0, now, surface)
    }

    fn fade_frame(
        &mut self,
        sweep: Sweep,
        multiplier: f32,
        now: Duration,
        surface: &mut dyn Surface,
    ) -> State {
        let multiplier = multiplier - self.settings.tuning.fade_out_step;
        if multiplier > 0.0 && !sweep.specks().is_empty() {
            surface.clear();
            sweep.draw(surface, multiplier);
            return State::FadingOut { sweep, multiplier };
        }

        surface.clear();
        surface.hide_line();
        let pause = self.pause_after(sweep.config());
        debug!(pause_ms = pause.as_millis() as u64, "sweep faded out");
        State::Waiting {
            due: now + pause,
            reason: WaitReason::Pause,
        }
    }

    fn pause_after(&mut self, config: &SweepConfig) -> Duration {
        if !config.pause_after.is_zero() {
            return config.pause_after;
        }
        let tuning = &self.settings.tuning;
        let (min, max) = (tuning.fallback_pause_min_ms, tuning.fallback_pause_max_ms);
        if max > min {
            Duration::from_millis(self.rng.gen_range(min..max))
        } else {
            Duration::from_millis(min)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{settings::Activation, surface::HeadlessSurface};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn settings(seed: u64) -> EngineSettings {
        EngineSettings {
            activation: Activation::opted_in(),
            tuning: Default::default(),
            seed: Some(seed),
        }
    }

    #[test]
    fn mount_arms_initial_delay() {
        let mut engine = Skimmer::new(settings(1));
        assert_eq!(engine.phase(), Phase::Unmounted);
        assert_eq!(engine.mount(ms(500)), Wake::Timer(ms(2500)));
        assert_eq!(
            engine.phase(),
            Phase::Waiting {
                due: ms(2500),
                reason: WaitReason::InitialDelay
            }
        );
        // Second mount is a no-op.
        assert_eq!(engine.mount(ms(900)), Wake::Timer(ms(2500)));
    }

    #[test]
    fn ineligible_mount_is_inactive() {
        let mut engine = Skimmer::new(EngineSettings::default());
        assert_eq!(engine.mount(ms(0)), Wake::Idle);
        assert_eq!(engine.phase(), Phase::Inactive);
    }

    #[test]
    fn early_pump_does_not_fire_timer() {
        let mut engine = Skimmer::new(settings(2));
        let mut surface = HeadlessSurface::new(Geometry::new(800.0, 400.0, 1.0));
        engine.mount(ms(0));
        assert_eq!(engine.pump(ms(1999), &mut surface), Wake::Timer(ms(2000)));
        assert!(surface.line.is_none());
        assert_eq!(engine.pump(ms(2000), &mut surface), Wake::Frame);
        assert!(surface.line.is_some());
        assert_eq!(engine.stats().sweeps_started, 1);
    }

    #[test]
    fn zero_pause_uses_fallback_range() {
        let mut engine = Skimmer::new(settings(3));
        let mut rng = StdRng::seed_from_u64(3);
        let config = SweepConfig {
            pause_after: Duration::ZERO,
            ..SweepConfig::generate(&mut rng)
        };
        for _ in 0..50 {
            let pause = engine.pause_after(&config);
            assert!(pause >= ms(3000) && pause < ms(10_000));
        }
    }

    #[test]
    fn unmount_is_idempotent_and_allows_remount() {
        let mut engine = Skimmer::new(settings(4));
        engine.mount(ms(0));
        engine.unmount();
        engine.unmount();
        assert_eq!(engine.wake(), Wake::Idle);
        assert_eq!(engine.mount(ms(100)), Wake::Timer(ms(2100)));
    }
}
