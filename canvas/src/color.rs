//! Structured caption colors.
//!
//! The editor works on an opaque [`Rgb`] plus an opacity percentage and only
//! composes them into a CSS `rgba(...)` string when writing an item. Reading an
//! existing item goes through [`Rgba::parse_css`], a small typed parser for the
//! handful of CSS forms the board ever stores.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255 };

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB` values.
    #[must_use]
    pub fn parse_hex(raw: &str) -> Option<Self> {
        let hex = raw.trim().strip_prefix('#')?;
        match hex.len() {
            3 => {
                let r = hex_byte(&hex.get(0..1)?.repeat(2))?;
                let g = hex_byte(&hex.get(1..2)?.repeat(2))?;
                let b = hex_byte(&hex.get(2..3)?.repeat(2))?;
                Some(Self { r, g, b })
            }
            6 => {
                let r = hex_byte(hex.get(0..2)?)?;
                let g = hex_byte(hex.get(2..4)?)?;
                let b = hex_byte(hex.get(4..6)?)?;
                Some(Self { r, g, b })
            }
            _ => None,
        }
    }

    /// Canonical uppercase `#RRGGBB`, the form the board stores text colors in.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// An RGB color with an alpha channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl Rgba {
    /// Build a color, clamping alpha into range.
    #[must_use]
    pub fn new(rgb: Rgb, alpha: f64) -> Self {
        let alpha = if alpha.is_nan() { 1.0 } else { alpha.clamp(0.0, 1.0) };
        Self { rgb, alpha }
    }

    /// Build a color from an opacity slider value (0–100, larger values clamp).
    #[must_use]
    pub fn from_opacity_percent(rgb: Rgb, percent: u8) -> Self {
        Self::new(rgb, f64::from(percent.min(100)) / 100.0)
    }

    /// Alpha as a whole percentage for the opacity slider.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn opacity_percent(&self) -> u8 {
        (self.alpha * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// Parse `#RGB`, `#RRGGBB`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
    ///
    /// Hex and `rgb()` forms are fully opaque.
    #[must_use]
    pub fn parse_css(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.starts_with('#') {
            return Rgb::parse_hex(trimmed).map(|rgb| Self::new(rgb, 1.0));
        }
        if let Some(body) = function_body(trimmed, "rgba") {
            let parts = split_args(body);
            let [r, g, b, a] = parts.as_slice() else {
                return None;
            };
            let rgb = Rgb::new(channel(r)?, channel(g)?, channel(b)?);
            return Some(Self::new(rgb, alpha(a)?));
        }
        if let Some(body) = function_body(trimmed, "rgb") {
            let parts = split_args(body);
            let [r, g, b] = parts.as_slice() else {
                return None;
            };
            return Some(Self::new(Rgb::new(channel(r)?, channel(g)?, channel(b)?), 1.0));
        }
        None
    }

    /// Compose into the stored CSS form, e.g. `rgba(0, 0, 0, 0.7)`.
    #[must_use]
    pub fn to_css(&self) -> String {
        let alpha = (self.alpha * 100.0).round() / 100.0;
        format!("rgba({}, {}, {}, {alpha})", self.rgb.r, self.rgb.g, self.rgb.b)
    }
}

fn hex_byte(raw: &str) -> Option<u8> {
    match u8::from_str_radix(raw, 16) {
        Ok(value) => Some(value),
        Err(_) => None,
    }
}

fn function_body<'a>(raw: &'a str, name: &str) -> Option<&'a str> {
    let rest = raw.strip_prefix(name)?.trim_start();
    rest.strip_prefix('(')?.strip_suffix(')')
}

fn split_args(body: &str) -> Vec<&str> {
    body.split(',').map(str::trim).collect()
}

fn channel(raw: &str) -> Option<u8> {
    match raw.parse::<u8>() {
        Ok(value) => Some(value),
        Err(_) => None,
    }
}

fn alpha(raw: &str) -> Option<f64> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}
