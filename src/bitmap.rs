// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use rgb::RGBA8;

/// A pixel source for box-drawing renderers.
pub trait BitmapSource {
    /// Returns the bitmap width.
    fn width(&self) -> u32;

    /// Returns the bitmap height.
    fn height(&self) -> u32;

    /// Returns an unpremultiplied pixel color.
    ///
    /// Returns `None` when coordinates are outside the bitmap.
    fn pixel(&self, x: u32, y: u32) -> Option<RGBA8>;
}

/// A raster image that contains rendering results.
///
/// Owns its pixel buffer. The buffer is freed when the bitmap is dropped
/// or explicitly via [`Bitmap::release`].
#[derive(Clone)]
pub struct Bitmap {
    pixmap: tiny_skia::Pixmap,
}

impl Bitmap {
    /// Wraps a pixmap.
    #[inline]
    pub fn from_pixmap(pixmap: tiny_skia::Pixmap) -> Self {
        Bitmap { pixmap }
    }

    /// Returns the bitmap size.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    /// Returns the underlying premultiplied RGBA data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Returns a copy of all pixels as unpremultiplied RGBA, row by row.
    pub fn to_rgba(&self) -> Vec<RGBA8> {
        self.pixmap.pixels().iter().map(|c| to_rgba8(*c)).collect()
    }

    /// Returns the underlying pixmap.
    #[inline]
    pub fn as_pixmap(&self) -> &tiny_skia::Pixmap {
        &self.pixmap
    }

    /// Consumes the bitmap and returns the underlying pixmap.
    #[inline]
    pub fn into_pixmap(self) -> tiny_skia::Pixmap {
        self.pixmap
    }

    /// Encodes the bitmap into a PNG data.
    pub fn encode_png(&self) -> Result<Vec<u8>, png::EncodingError> {
        self.pixmap.encode_png()
    }

    /// Saves the bitmap as a PNG file.
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), png::EncodingError> {
        self.pixmap.save_png(path)
    }

    /// Frees the pixel buffer.
    ///
    /// Same as dropping the bitmap.
    #[inline]
    pub fn release(self) {}
}

impl BitmapSource for Bitmap {
    #[inline]
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[inline]
    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn pixel(&self, x: u32, y: u32) -> Option<RGBA8> {
        // `Pixmap::pixel` checks only the flat index.
        if x >= self.width() || y >= self.height() {
            return None;
        }

        self.pixmap.pixel(x, y).map(to_rgba8)
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .finish()
    }
}

#[inline]
fn to_rgba8(c: tiny_skia::PremultipliedColorU8) -> RGBA8 {
    let c = c.demultiply();
    RGBA8::new(c.red(), c.green(), c.blue(), c.alpha())
}
