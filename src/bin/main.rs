use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use clap::Parser;
use eframe::egui;
use subpixel_skimmer::{
    Activation, EngineSettings, Geometry, LineStyle, Phase, Rgb, Skimmer, SkimmerError, SkimmerResult,
    Square, Surface, WaitReason, Wake,
};

const HERO_FILL: egui::Color32 = egui::Color32::from_rgb(9, 46, 74);
const LINE_COLOR: Rgb = Rgb::new(235, 250, 255);
const STATUS_REFRESH: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "skimmer", version, about = "Hero section with the sub-pixel skimmer overlay")]
struct Cli {
    /// Settings JSON (activation, tuning, seed).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Start with the effect switched off.
    #[arg(long)]
    disable: bool,

    /// Behave as if the viewer prefers reduced motion.
    #[arg(long)]
    reduced_motion: bool,

    /// Seed for reproducible sweeps.
    #[arg(long)]
    seed: Option<u64>,
}

fn color32(c: Rgb, alpha: f32) -> egui::Color32 {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, a)
}

// Retained canvas + line indicator layered over the hero panel.
#[derive(Default)]
struct OverlaySurface {
    rect: Option<egui::Rect>,
    pixels_per_point: f32,
    backing: Option<(u32, u32)>,
    squares: Vec<Square>,
    line: Option<(f32, LineStyle)>,
}

impl OverlaySurface {
    fn paint(&self, painter: &egui::Painter) {
        let Some(rect) = self.rect else {
            return;
        };

        for sq in &self.squares {
            let min = rect.min + egui::vec2(sq.x, sq.y);
            painter.rect_filled(
                egui::Rect::from_min_size(min, egui::vec2(sq.size, sq.size)),
                0.0,
                color32(sq.color, sq.alpha),
            );
        }

        if let Some((x, style)) = self.line {
            let left = rect.min.x + x;
            let glow_width = style.width * 6.0;
            painter.rect_filled(
                egui::Rect::from_min_max(
                    egui::pos2(left - glow_width * 0.5, rect.min.y),
                    egui::pos2(left + glow_width * 0.5, rect.max.y),
                ),
                0.0,
                color32(subpixel_skimmer::POOL_BLUE, style.glow * style.opacity * 0.35),
            );
            painter.rect_filled(
                egui::Rect::from_min_max(
                    egui::pos2(left, rect.min.y),
                    egui::pos2(left + style.width, rect.max.y),
                ),
                0.0,
                color32(LINE_COLOR, style.opacity),
            );
        }
    }
}

impl Surface for OverlaySurface {
    fn geometry(&self) -> Option<Geometry> {
        self.rect
            .map(|r| Geometry::new(r.width(), r.height(), self.pixels_per_point))
    }

    fn configure(&mut self, geometry: Geometry) -> SkimmerResult<()> {
        if !(geometry.pixel_ratio > 0.0) {
            return Err(SkimmerError::context("no pixel ratio reported yet"));
        }
        self.backing = Some(geometry.backing_size());
        Ok(())
    }

    fn clear(&mut self) {
        self.squares.clear();
    }

    fn fill_square(&mut self, x: f32, y: f32, size: f32, color: Rgb, alpha: f32) {
        self.squares.push(Square {
            x,
            y,
            size,
            color,
            alpha,
        });
    }

    fn show_line(&mut self, x: f32, style: LineStyle) {
        self.line = Some((x, style));
    }

    fn hide_line(&mut self) {
        self.line = None;
    }
}

struct SkimmerDemo {
    settings: EngineSettings,
    engine: Skimmer,
    surface: OverlaySurface,
    clock_origin: Instant,
    mounted_at: Duration,
    page_hidden: bool,
    last_geometry: Option<Geometry>,
}

impl SkimmerDemo {
    fn new(_cc: &eframe::CreationContext, settings: EngineSettings) -> Self {
        let mut engine = Skimmer::new(settings);
        engine.mount(Duration::ZERO);
        Self {
            settings,
            engine,
            surface: OverlaySurface::default(),
            clock_origin: Instant::now(),
            mounted_at: Duration::ZERO,
            page_hidden: false,
            last_geometry: None,
        }
    }

    fn now(&self) -> Duration {
        self.clock_origin.elapsed()
    }

    // Activation is read once at mount, so flag changes need a fresh engine.
    fn remount(&mut self) {
        let now = self.now();
        self.engine.unmount();
        self.surface.clear();
        self.surface.hide_line();
        self.engine = Skimmer::new(self.settings);
        self.engine.mount(now);
        self.engine.set_visible(!self.page_hidden);
        self.mounted_at = now;
    }

    fn phase_label(&self, now: Duration) -> String {
        match self.engine.phase() {
            Phase::Unmounted => "unmounted".to_owned(),
            Phase::Inactive => "inactive (disabled or reduced motion)".to_owned(),
            Phase::Waiting { due, reason } => {
                let left = due.saturating_sub(now).as_secs_f32();
                match reason {
                    WaitReason::InitialDelay => format!("initial delay: {left:.1}s remaining"),
                    WaitReason::Retry => format!("waiting for surface: {left:.1}s"),
                    WaitReason::Pause => format!("paused: {left:.1}s until next sweep"),
                }
            }
            Phase::Sweeping { progress } => {
                let kind = self
                    .engine
                    .sweep()
                    .map(|s| s.config().sweep_type.label())
                    .unwrap_or("?");
                format!("sweeping ({kind}): {:.0}%", progress * 100.0)
            }
            Phase::FadingOut { multiplier } => format!("fading out: {multiplier:.2}"),
        }
    }

    fn render_ui_panel(&mut self, ui: &mut egui::Ui, now: Duration) {
        ui.heading("Skimmer");
        ui.label(format!("Phase: {}", self.phase_label(now)));
        ui.label(format!(
            "Time since mount: {:.1}s",
            now.saturating_sub(self.mounted_at).as_secs_f32()
        ));

        if let Some(g) = self.last_geometry {
            ui.label(format!(
                "Container: {:.0}x{:.0} @ {:.2}x",
                g.width, g.height, g.pixel_ratio
            ));
        }
        if let Some(sweep) = self.engine.sweep() {
            ui.label(format!("Active specks: {}", sweep.specks().len()));
            ui.label(format!("Direction: {:?}", sweep.config().direction));
        }

        ui.separator();
        let mut remount = false;
        remount |= ui
            .checkbox(&mut self.settings.activation.enabled, "Skimmer enabled")
            .changed();
        remount |= ui
            .checkbox(&mut self.settings.activation.reduced_motion, "Prefers reduced motion")
            .changed();
        if remount {
            self.remount();
        }
        if ui.checkbox(&mut self.page_hidden, "Page hidden").changed() {
            self.engine.set_visible(!self.page_hidden);
        }

        ui.separator();
        let stats = self.engine.stats();
        ui.label(format!("Sweeps: {}", stats.sweeps_completed));
        ui.label(format!("Specks spawned: {}", stats.specks_spawned));
        ui.label(format!("Specks captured: {}", stats.specks_captured));
        ui.label(format!("Readiness retries: {}", stats.readiness_retries));
    }
}

impl eframe::App for SkimmerDemo {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = self.now();

        egui::SidePanel::left("Control Panel").show(ctx, |ui| {
            self.render_ui_panel(ui, now);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(HERO_FILL))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                self.surface.rect = Some(rect);
                self.surface.pixels_per_point = ctx.pixels_per_point();

                let geometry = self.surface.geometry();
                if geometry != self.last_geometry {
                    self.last_geometry = geometry;
                    self.engine.resize(&mut self.surface);
                }

                let painter = ui.painter_at(rect);
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Crystal clear water, every week",
                    egui::FontId::proportional(34.0),
                    egui::Color32::WHITE,
                );

                let wake = self.engine.pump(now, &mut self.surface);
                self.surface.paint(&painter);

                match wake {
                    Wake::Frame => ctx.request_repaint(),
                    Wake::Timer(due) => {
                        ctx.request_repaint_after(due.saturating_sub(now).min(STATUS_REFRESH))
                    }
                    Wake::Idle => ctx.request_repaint_after(STATUS_REFRESH),
                }
            });
    }
}

impl Drop for SkimmerDemo {
    fn drop(&mut self) {
        self.engine.unmount();
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => EngineSettings::load(path)
            .with_context(|| format!("load settings '{}'", path.display()))?,
        // A host page that mounts the skimmer has opted in.
        None => EngineSettings {
            activation: Activation::opted_in(),
            ..EngineSettings::default()
        },
    };
    if cli.disable {
        settings.activation.enabled = false;
    }
    if cli.reduced_motion {
        settings.activation.reduced_motion = true;
    }
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }

    eframe::run_native(
        "Sub-Pixel Skimmer",
        eframe::NativeOptions {
            renderer: eframe::Renderer::Wgpu,
            initial_window_size: Some(egui::vec2(1180.0, 660.0)),
            ..Default::default()
        },
        Box::new(move |cc| Box::new(SkimmerDemo::new(cc, settings))),
    )
    .map_err(|err| anyhow::anyhow!("eframe: {err}"))
}
