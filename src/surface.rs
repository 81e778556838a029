use crate::{
    color::Rgb,
    config::LineStyle,
    error::{SkimmerError, SkimmerResult},
};

/// Container size in CSS pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Geometry {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Drawing buffer size in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        let ratio = if self.pixel_ratio > 0.0 {
            self.pixel_ratio
        } else {
            1.0
        };
        (
            (self.width * ratio).ceil().max(0.0) as u32,
            (self.height * ratio).ceil().max(0.0) as u32,
        )
    }
}

/// What the engine draws on: a canvas layered over the container plus the
/// line indicator. Canvas contents persist until `clear`.
pub trait Surface {
    /// `None` while the container is not attached.
    fn geometry(&self) -> Option<Geometry>;

    /// Sizes the drawing buffer for `geometry`.
    fn configure(&mut self, geometry: Geometry) -> SkimmerResult<()>;

    fn clear(&mut self);

    fn fill_square(&mut self, x: f32, y: f32, size: f32, color: Rgb, alpha: f32);

    fn show_line(&mut self, x: f32, style: LineStyle);

    fn hide_line(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Square {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Rgb,
    pub alpha: f32,
}

/// In-memory surface used by the replay tool and tests.
#[derive(Clone, Debug, Default)]
pub struct HeadlessSurface {
    pub geometry: Option<Geometry>,
    pub backing: Option<(u32, u32)>,
    pub squares: Vec<Square>,
    pub line: Option<(f32, LineStyle)>,
    pub clears: u64,
    pub squares_drawn: u64,
}

impl HeadlessSurface {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry: Some(geometry),
            ..Self::default()
        }
    }
}

impl Surface for HeadlessSurface {
    fn geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    fn configure(&mut self, geometry: Geometry) -> SkimmerResult<()> {
        if !geometry.has_area() {
            return Err(SkimmerError::surface_not_ready("container has zero area"));
        }
        self.backing = Some(geometry.backing_size());
        Ok(())
    }

    fn clear(&mut self) {
        self.squares.clear();
        self.clears += 1;
    }

    fn fill_square(&mut self, x: f32, y: f32, size: f32, color: Rgb, alpha: f32) {
        self.squares.push(Square {
            x,
            y,
            size,
            color,
            alpha,
        });
        self.squares_drawn += 1;
    }

    fn show_line(&mut self, x: f32, style: LineStyle) {
        self.line = Some((x, style));
    }

    fn hide_line(&mut self) {
        self.line = None;
    }
}
