// SPDX-License-Identifier: MPL-2.0

//! Display-adjustment operations and their CPU implementation
//!
//! Each operation mirrors one of the CSS filter shorthand functions and works
//! on straight (non-premultiplied) RGBA8 data. Operations run left to right
//! and every step is quantised back to 8 bits, so running a chain over an
//! already filtered image compounds the effect.

use crate::errors::PhotoError;
use image::RgbaImage;
use std::fmt;
use std::str::FromStr;

/// A single visual adjustment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    /// Contrast slope around mid-grey (1.0 = unchanged)
    Contrast(f32),
    /// Linear brightness multiplier (1.0 = unchanged)
    Brightness(f32),
    /// Saturation factor (1.0 = unchanged, 0.0 = greyscale)
    Saturate(f32),
    /// Hue rotation in degrees
    HueRotate(f32),
    /// Sepia amount in [0, 1]
    Sepia(f32),
    /// Gaussian blur radius in pixels (standard deviation)
    Blur(f32),
}

impl FilterOp {
    /// CSS function name of this operation
    pub fn name(&self) -> &'static str {
        match self {
            FilterOp::Contrast(_) => "contrast",
            FilterOp::Brightness(_) => "brightness",
            FilterOp::Saturate(_) => "saturate",
            FilterOp::HueRotate(_) => "hue-rotate",
            FilterOp::Sepia(_) => "sepia",
            FilterOp::Blur(_) => "blur",
        }
    }

    /// Whether applying this operation leaves every pixel unchanged
    pub fn is_identity(&self) -> bool {
        match *self {
            FilterOp::Contrast(k) | FilterOp::Brightness(k) | FilterOp::Saturate(k) => k == 1.0,
            FilterOp::HueRotate(deg) => deg % 360.0 == 0.0,
            FilterOp::Sepia(amount) => amount <= 0.0,
            FilterOp::Blur(radius) => radius <= 0.0,
        }
    }

    /// Apply this operation to an image in place
    pub fn apply(&self, image: &mut RgbaImage) {
        if self.is_identity() {
            return;
        }

        match *self {
            FilterOp::Brightness(k) => map_channels(image, |c| c * k),
            FilterOp::Contrast(k) => map_channels(image, |c| (c - 0.5) * k + 0.5),
            FilterOp::Saturate(s) => apply_matrix(image, &saturate_matrix(s)),
            FilterOp::HueRotate(deg) => apply_matrix(image, &hue_rotate_matrix(deg)),
            FilterOp::Sepia(amount) => apply_matrix(image, &sepia_matrix(amount)),
            FilterOp::Blur(radius) => {
                *image = image::imageops::blur(&*image, radius);
            }
        }
    }

    fn from_parts(name: &str, arg: &str) -> Result<Self, PhotoError> {
        let invalid = || PhotoError::InvalidFilter(format!("{}({})", name, arg));

        let (number, unit) = split_unit(arg.trim());
        let mut value: f32 = number.parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }

        match (name, unit) {
            ("contrast" | "brightness" | "saturate" | "sepia", "%") => value /= 100.0,
            ("contrast" | "brightness" | "saturate" | "sepia", "") => {}
            ("hue-rotate", "deg" | "") => {}
            ("blur", "px" | "") => {}
            _ => return Err(invalid()),
        }

        Ok(match name {
            "contrast" => FilterOp::Contrast(value),
            "brightness" => FilterOp::Brightness(value),
            "saturate" => FilterOp::Saturate(value),
            "hue-rotate" => FilterOp::HueRotate(value),
            "sepia" => FilterOp::Sepia(value),
            "blur" => FilterOp::Blur(value),
            _ => return Err(invalid()),
        })
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FilterOp::HueRotate(deg) => write!(f, "hue-rotate({}deg)", deg),
            FilterOp::Blur(px) => write!(f, "blur({}px)", px),
            FilterOp::Contrast(v)
            | FilterOp::Brightness(v)
            | FilterOp::Saturate(v)
            | FilterOp::Sepia(v) => write!(f, "{}({})", self.name(), v),
        }
    }
}

/// Ordered list of operations, applied left to right
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChain(Vec<FilterOp>);

impl FilterChain {
    pub fn new(ops: Vec<FilterOp>) -> Self {
        Self(ops)
    }

    /// Parse a chain such as `contrast(1.1) hue-rotate(-10deg) blur(0.5px)`
    pub fn parse(text: &str) -> Result<Self, PhotoError> {
        text.split_whitespace()
            .map(|token| {
                let (name, rest) = token
                    .split_once('(')
                    .ok_or_else(|| PhotoError::InvalidFilter(token.to_string()))?;
                let arg = rest
                    .strip_suffix(')')
                    .ok_or_else(|| PhotoError::InvalidFilter(token.to_string()))?;
                FilterOp::from_parts(name, arg)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(FilterChain)
    }

    pub fn ops(&self) -> &[FilterOp] {
        &self.0
    }

    /// Append an operation to the end of the chain
    pub fn push(&mut self, op: FilterOp) {
        self.0.push(op);
    }

    /// Whether the whole chain is a no-op
    pub fn is_identity(&self) -> bool {
        self.0.iter().all(FilterOp::is_identity)
    }

    /// Apply every operation in order
    pub fn apply(&self, image: &mut RgbaImage) {
        for op in &self.0 {
            op.apply(image);
        }
    }
}

impl From<&[FilterOp]> for FilterChain {
    fn from(ops: &[FilterOp]) -> Self {
        Self(ops.to_vec())
    }
}

impl FromStr for FilterChain {
    type Err = PhotoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

fn split_unit(arg: &str) -> (&str, &str) {
    for unit in ["deg", "px", "%"] {
        if let Some(number) = arg.strip_suffix(unit) {
            return (number, unit);
        }
    }
    (arg, "")
}

#[inline]
fn to_unit(v: u8) -> f32 {
    v as f32 / 255.0
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn map_channels(image: &mut RgbaImage, f: impl Fn(f32) -> f32) {
    for pixel in image.pixels_mut() {
        for c in 0..3 {
            pixel[c] = to_byte(f(to_unit(pixel[c])));
        }
    }
}

type Matrix = [[f32; 3]; 3];

fn apply_matrix(image: &mut RgbaImage, m: &Matrix) {
    for pixel in image.pixels_mut() {
        let r = to_unit(pixel[0]);
        let g = to_unit(pixel[1]);
        let b = to_unit(pixel[2]);
        for (c, row) in m.iter().enumerate() {
            pixel[c] = to_byte(row[0] * r + row[1] * g + row[2] * b);
        }
    }
}

fn saturate_matrix(s: f32) -> Matrix {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn hue_rotate_matrix(degrees: f32) -> Matrix {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

fn sepia_matrix(amount: f32) -> Matrix {
    let inv = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.393 + 0.607 * inv, 0.769 - 0.769 * inv, 0.189 - 0.189 * inv],
        [0.349 - 0.349 * inv, 0.686 + 0.314 * inv, 0.168 - 0.168 * inv],
        [0.272 - 0.272 * inv, 0.534 - 0.534 * inv, 0.131 + 0.869 * inv],
    ]
}
