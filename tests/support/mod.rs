#![allow(dead_code)]

use std::time::Duration;

use subpixel_skimmer::{
    Geometry, LineStyle, Rgb, SkimmerError, SkimmerResult, Square, Surface,
};

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Configure(Geometry),
    Clear,
    Fill(Square),
    ShowLine(f32, LineStyle),
    HideLine,
}

/// Surface that records every mutating call.
#[derive(Default)]
pub struct RecordingSurface {
    pub geometry: Option<Geometry>,
    pub fail_configure: bool,
    pub calls: Vec<Call>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            geometry: Some(Geometry::new(width, height, 1.0)),
            ..Self::default()
        }
    }

    pub fn configures(&self) -> Vec<Geometry> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Configure(g) => Some(*g),
                _ => None,
            })
            .collect()
    }

    pub fn fills(&self) -> impl DoubleEndedIterator<Item = &Square> {
        self.calls.iter().filter_map(|c| match c {
            Call::Fill(sq) => Some(sq),
            _ => None,
        })
    }

    pub fn last_line(&self) -> Option<Option<f32>> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::ShowLine(x, _) => Some(Some(*x)),
            Call::HideLine => Some(None),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    fn configure(&mut self, geometry: Geometry) -> SkimmerResult<()> {
        if self.fail_configure {
            return Err(SkimmerError::context("no 2d context"));
        }
        self.calls.push(Call::Configure(geometry));
        Ok(())
    }

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }

    fn fill_square(&mut self, x: f32, y: f32, size: f32, color: Rgb, alpha: f32) {
        self.calls.push(Call::Fill(Square {
            x,
            y,
            size,
            color,
            alpha,
        }));
    }

    fn show_line(&mut self, x: f32, style: LineStyle) {
        self.calls.push(Call::ShowLine(x, style));
    }

    fn hide_line(&mut self) {
        self.calls.push(Call::HideLine);
    }
}
