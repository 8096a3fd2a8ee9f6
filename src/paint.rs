// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;

pub use svgtypes::Color;

/// A `fill` or `stroke` paint state of a single element.
///
/// `Unset` and `None` are different things: `Unset` means that the element
/// doesn't specify a paint at all and will use an inherited or a default one,
/// while `None` is an explicit `none`, i.e. the author asked to paint nothing.
#[derive(Clone, PartialEq, Debug, Default)]
pub enum Paint {
    /// Not specified on the element.
    #[default]
    Unset,
    /// An explicit `none`.
    None,
    /// An explicit paint.
    Value(PaintValue),
}

/// An explicit paint value.
#[derive(Clone, PartialEq, Debug)]
pub enum PaintValue {
    /// A plain color.
    Color(Color),
    /// `currentColor`.
    CurrentColor,
    /// A paint server reference or a context paint.
    ///
    /// Stored as written, since paint servers are resolved later by `usvg`.
    Reference(String),
}

impl Paint {
    /// Opaque white.
    #[inline]
    pub fn white() -> Self {
        Paint::color(Color::white())
    }

    /// Creates a color paint.
    #[inline]
    pub fn color(color: Color) -> Self {
        Paint::Value(PaintValue::Color(color))
    }

    /// Parses a `fill`/`stroke` attribute value.
    ///
    /// `inherit` and malformed values are treated as unset.
    pub fn from_attribute(value: &str) -> Self {
        match svgtypes::Paint::from_str(value) {
            Ok(svgtypes::Paint::None) => Paint::None,
            Ok(svgtypes::Paint::Inherit) => Paint::Unset,
            Ok(svgtypes::Paint::CurrentColor) => Paint::Value(PaintValue::CurrentColor),
            Ok(svgtypes::Paint::Color(c)) => Paint::color(c),
            Ok(svgtypes::Paint::FuncIRI(..))
            | Ok(svgtypes::Paint::ContextFill)
            | Ok(svgtypes::Paint::ContextStroke) => {
                Paint::Value(PaintValue::Reference(value.trim().to_string()))
            }
            Err(_) => {
                log::warn!("Failed to parse paint value: '{}'.", value);
                Paint::Unset
            }
        }
    }

    /// Checks that paint is not specified.
    #[inline]
    pub fn is_unset(&self) -> bool {
        matches!(self, Paint::Unset)
    }

    /// Checks that paint is an explicit `none`.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Paint::None)
    }

    /// Returns the paint as an attribute value, unless it's unset.
    pub fn to_attribute(&self) -> Option<String> {
        match self {
            Paint::Unset => None,
            Paint::None => Some("none".to_string()),
            Paint::Value(v) => Some(v.to_string()),
        }
    }
}

impl fmt::Display for PaintValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PaintValue::Color(c) => {
                if c.alpha == 255 {
                    write!(f, "#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
                } else {
                    let a = c.alpha as f32 / 255.0;
                    write!(f, "rgba({},{},{},{})", c.red, c.green, c.blue, a)
                }
            }
            PaintValue::CurrentColor => write!(f, "currentColor"),
            PaintValue::Reference(ref s) => write!(f, "{}", s),
        }
    }
}
