//! Packed pixel values.
//!
//! A pixel is a `u32`: bits 31..24 unused, the low 24 bits three 8-bit
//! channels. Which channel sits where is a property of the LED hardware,
//! captured by [`ColorOrder`].

use serde::{Deserialize, Serialize};

/// Channel order of the attached LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorOrder {
    /// `r << 16 | g << 8 | b`
    Rgb,
    /// `g << 16 | r << 8 | b` (WS2812)
    #[default]
    Grb,
}

impl ColorOrder {
    pub const fn pack(self, r: u8, g: u8, b: u8) -> u32 {
        let (hi, mid) = match self {
            Self::Rgb => (r, g),
            Self::Grb => (g, r),
        };
        (hi as u32) << 16 | (mid as u32) << 8 | b as u32
    }

    /// Split a packed pixel back into `(r, g, b)`.
    pub const fn unpack(self, pixel: u32) -> (u8, u8, u8) {
        let hi = (pixel >> 16) as u8;
        let mid = (pixel >> 8) as u8;
        let b = pixel as u8;
        match self {
            Self::Rgb => (hi, mid, b),
            Self::Grb => (mid, hi, b),
        }
    }
}

/// Channel value at step `i` of a linear ramp from `c0` towards `cn`
/// spread over `steps` dots. Floors like integer division on the reals and
/// clamps to a valid channel. Any `i32` endpoints and any run length are
/// accepted.
pub fn ramp(c0: i32, cn: i32, i: i64, steps: i64) -> u8 {
    if steps <= 0 {
        return c0.clamp(0, 255) as u8;
    }
    let delta = i128::from(cn) - i128::from(c0);
    let v = i128::from(c0) + (i128::from(i) * delta).div_euclid(i128::from(steps));
    v.clamp(0, 255) as u8
}
