#![forbid(unsafe_code)]

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod headless;
pub mod settings;
pub mod speck;
pub mod surface;
pub mod sweep;

pub use color::{POOL_BLUE, Rgb};
pub use config::{Direction, LineStyle, Span, SweepConfig, SweepType};
pub use engine::{EngineStats, Phase, Skimmer, WaitReason, Wake};
pub use error::{SkimmerError, SkimmerResult};
pub use headless::FrameClock;
pub use settings::{Activation, EngineSettings, Tuning};
pub use speck::Speck;
pub use surface::{Geometry, HeadlessSurface, Square, Surface};
pub use sweep::{StepReport, Sweep};
