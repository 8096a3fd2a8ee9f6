// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::error::{Error, Result};

/// Independent per-axis scale factors.
///
/// Applied to the intrinsic size before fitting into the size caps.
/// Can be used to compensate non-square output cells, like terminal characters
/// that are about twice as tall as they are wide.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Scale {
    /// Horizontal factor.
    pub x: f64,
    /// Vertical factor.
    pub y: f64,
}

impl Scale {
    /// Creates a new `Scale`.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Scale { x, y }
    }

    /// Checks that both factors are positive finite numbers.
    pub fn validate(&self) -> Result<()> {
        check_factor("scale_x", self.x)?;
        check_factor("scale_y", self.y)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale { x: 1.0, y: 1.0 }
    }
}

fn check_factor(name: &str, n: f64) -> Result<()> {
    // `!(n > 0.0)` catches NaN as well.
    if !(n > 0.0) || !n.is_finite() {
        return Err(Error::InvalidArgument(format!(
            "{} should be a positive number, got {}",
            name, n
        )));
    }

    Ok(())
}

/// A target bitmap size.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TargetSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl TargetSize {
    /// Creates a new `TargetSize`.
    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        TargetSize { width, height }
    }
}

/// Size caps. `None` means unbounded in that axis.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct SizeLimits {
    /// Maximum width in pixels.
    pub max_width: Option<u32>,
    /// Maximum height in pixels.
    pub max_height: Option<u32>,
}

/// Computes a bitmap size from a document size.
pub trait SizeCalculator: Send + Sync {
    /// Returns the target size for a document with the `intrinsic` width and height.
    fn calculate(
        &self,
        intrinsic: (f64, f64),
        limits: SizeLimits,
        scale: Scale,
    ) -> Result<TargetSize>;
}

impl<F> SizeCalculator for F
where
    F: Fn((f64, f64), SizeLimits, Scale) -> Result<TargetSize> + Send + Sync,
{
    fn calculate(
        &self,
        intrinsic: (f64, f64),
        limits: SizeLimits,
        scale: Scale,
    ) -> Result<TargetSize> {
        self(intrinsic, limits, scale)
    }
}

/// Fits the scaled document into the size caps, preserving the scaled aspect ratio.
#[derive(Clone, Copy, Default, Debug)]
pub struct AspectFit;

impl SizeCalculator for AspectFit {
    fn calculate(
        &self,
        intrinsic: (f64, f64),
        limits: SizeLimits,
        scale: Scale,
    ) -> Result<TargetSize> {
        fit(intrinsic, limits, scale)
    }
}

/// Fits the scaled document into the size caps, preserving the scaled aspect ratio.
///
/// The document size is stretched by `scale` first. Without any caps
/// the result is the stretched size, floored.
///
/// Otherwise a missing cap defaults to the stretched size and the tighter
/// axis is selected: the width-constrained result is used when it fits
/// the height cap, including an exact tie, otherwise the height-constrained one.
pub fn fit(intrinsic: (f64, f64), limits: SizeLimits, scale: Scale) -> Result<TargetSize> {
    scale.validate()?;

    let (w, h) = intrinsic;
    if !(w > 0.0 && h > 0.0) || !w.is_finite() || !h.is_finite() {
        return Err(Error::InvalidArgument(format!(
            "document size should be positive, got {}x{}",
            w, h
        )));
    }

    if limits.max_width == Some(0) || limits.max_height == Some(0) {
        return Err(Error::InvalidArgument("size caps cannot be zero".to_string()));
    }

    let scaled_w = w * scale.x;
    let scaled_h = h * scale.y;

    if limits.max_width.is_none() && limits.max_height.is_none() {
        return Ok(TargetSize::new(
            to_pixels(scaled_w.floor())?,
            to_pixels(scaled_h.floor())?,
        ));
    }

    let aspect = scaled_w / scaled_h;

    let bound_w = limits
        .max_width
        .map(f64::from)
        .unwrap_or_else(|| scaled_w.floor());
    let bound_h = limits
        .max_height
        .map(f64::from)
        .unwrap_or_else(|| scaled_h.floor());

    let (tw, th) = if bound_w / aspect <= bound_h {
        (bound_w, (bound_w / aspect).floor())
    } else {
        ((bound_h * aspect).floor(), bound_h)
    };

    Ok(TargetSize::new(to_pixels(tw)?, to_pixels(th)?))
}

fn to_pixels(n: f64) -> Result<u32> {
    if n > u32::MAX as f64 {
        return Err(Error::InvalidArgument(format!(
            "target size {} is too big",
            n
        )));
    }

    Ok(n as u32)
}
