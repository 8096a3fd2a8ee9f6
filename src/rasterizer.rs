// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::bitmap::Bitmap;
use crate::dimensions::TargetSize;
use crate::error::{Error, Result};

/// Draws a `usvg` tree into a bitmap of an exact size.
pub trait Rasterizer: Send + Sync {
    /// Renders the whole tree stretched to `size`.
    fn rasterize(&self, tree: &usvg::Tree, size: TargetSize) -> Result<Bitmap>;
}

impl<F> Rasterizer for F
where
    F: Fn(&usvg::Tree, TargetSize) -> Result<Bitmap> + Send + Sync,
{
    fn rasterize(&self, tree: &usvg::Tree, size: TargetSize) -> Result<Bitmap> {
        self(tree, size)
    }
}

/// A `resvg` based rasterizer.
#[derive(Clone, Copy, Default, Debug)]
pub struct ResvgRasterizer {
    /// A color to fill the bitmap with before rendering.
    ///
    /// Default: transparent
    pub background: Option<tiny_skia::Color>,
}

impl Rasterizer for ResvgRasterizer {
    fn rasterize(&self, tree: &usvg::Tree, size: TargetSize) -> Result<Bitmap> {
        let mut pixmap = tiny_skia::Pixmap::new(size.width, size.height).ok_or_else(|| {
            Error::RenderingFailed(format!(
                "cannot allocate a {}x{} bitmap",
                size.width, size.height
            ))
        })?;

        if let Some(background) = self.background {
            pixmap.fill(background);
        }

        // Axes are scaled independently, so a skewed target size stretches the image.
        let tree_size = tree.size();
        let ts = tiny_skia::Transform::from_scale(
            size.width as f32 / tree_size.width(),
            size.height as f32 / tree_size.height(),
        );

        resvg::render(tree, ts, &mut pixmap.as_mut());

        Ok(Bitmap::from_pixmap(pixmap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::BitmapSource;

    fn parse(text: &str) -> usvg::Tree {
        usvg::Tree::from_str(text, &usvg::Options::default()).unwrap()
    }

    #[test]
    fn stretches_to_size() {
        let tree = parse(
            "<svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'>
                <rect width='5' height='10' fill='#ffffff'/>
            </svg>",
        );

        let bitmap = ResvgRasterizer::default()
            .rasterize(&tree, TargetSize::new(20, 5))
            .unwrap();

        assert_eq!((bitmap.width(), bitmap.height()), (20, 5));
        assert_eq!(bitmap.pixel(2, 2).unwrap().a, 255);
        assert_eq!(bitmap.pixel(17, 2).unwrap().a, 0);
    }

    #[test]
    fn background() {
        let tree = parse("<svg xmlns='http://www.w3.org/2000/svg' width='4' height='4'/>");
        let rasterizer = ResvgRasterizer {
            background: Some(tiny_skia::Color::BLACK),
        };

        let bitmap = rasterizer.rasterize(&tree, TargetSize::new(4, 4)).unwrap();
        assert_eq!(bitmap.pixel(0, 0), Some(rgb::RGBA8::new(0, 0, 0, 255)));
    }

    #[test]
    fn zero_size() {
        let tree = parse("<svg xmlns='http://www.w3.org/2000/svg' width='4' height='4'/>");
        let res = ResvgRasterizer::default().rasterize(&tree, TargetSize::new(0, 4));
        assert!(matches!(res, Err(Error::RenderingFailed(_))));
    }
}
