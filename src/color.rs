use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Base speck colour, roughly hsl(194, 83%, 50%).
pub const POOL_BLUE: Rgb = Rgb::new(24, 185, 232);

const BASE_HUE: f32 = 194.0;
const BASE_SATURATION: f32 = 83.0;
const BASE_LIGHTNESS: f32 = 50.0;

/// `h` in degrees, `s` and `l` in percent.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    let s = s / 100.0;
    let l = l / 100.0;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(channel(r), channel(g), channel(b))
}

pub fn speck_color<R: Rng + ?Sized>(rng: &mut R, variation: bool) -> Rgb {
    if !variation {
        return POOL_BLUE;
    }

    let hue_shift = rng.gen_range(-10.0..10.0);
    let saturation_scale = rng.gen_range(0.8..1.2);
    let lightness_scale = rng.gen_range(0.9..1.1);

    let h = (BASE_HUE + hue_shift).clamp(0.0, 360.0);
    let s = (BASE_SATURATION * saturation_scale).clamp(0.0, 100.0);
    let l = (BASE_LIGHTNESS * lightness_scale).clamp(0.0, 100.0);
    hsl_to_rgb(h, s, l)
}
