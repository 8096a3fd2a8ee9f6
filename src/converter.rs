// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::bitmap::Bitmap;
use crate::dimensions::{AspectFit, Scale, SizeCalculator, SizeLimits, TargetSize};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::fixup::{Fixup, WhitePaint};
use crate::palette::Palette;
use crate::rasterizer::{Rasterizer, ResvgRasterizer};

/// Conversion options.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ConvertOptions {
    /// Maximum bitmap width in pixels.
    ///
    /// Default: unbounded
    pub max_width: Option<u32>,

    /// Maximum bitmap height in pixels.
    ///
    /// Default: unbounded
    pub max_height: Option<u32>,

    /// Horizontal stretch factor.
    ///
    /// Default: 1.0
    pub scale_x: f64,

    /// Vertical stretch factor.
    ///
    /// Default: 1.0
    pub scale_y: f64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            max_width: None,
            max_height: None,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl ConvertOptions {
    /// Returns size caps.
    #[inline]
    pub fn limits(&self) -> SizeLimits {
        SizeLimits {
            max_width: self.max_width,
            max_height: self.max_height,
        }
    }

    /// Returns scale factors.
    #[inline]
    pub fn scale(&self) -> Scale {
        Scale::new(self.scale_x, self.scale_y)
    }
}

/// Conversion options expressed in palette characters.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PaletteOptions {
    /// Maximum number of character rows.
    ///
    /// Default: unbounded
    pub max_rows: Option<u32>,

    /// Maximum number of character columns.
    ///
    /// Default: unbounded
    pub max_columns: Option<u32>,

    /// Horizontal stretch factor.
    ///
    /// Monospace character cells are about twice as tall as they are wide,
    /// hence the default.
    ///
    /// Default: 2.0
    pub scale_x: f64,

    /// Vertical stretch factor.
    ///
    /// Default: 1.0
    pub scale_y: f64,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        PaletteOptions {
            max_rows: None,
            max_columns: None,
            scale_x: 2.0,
            scale_y: 1.0,
        }
    }
}

impl PaletteOptions {
    /// Converts character-based options into pixel-based ones.
    ///
    /// Caps are multiplied by the palette block size
    /// and so are the scale factors.
    pub fn to_convert_options<P: Palette + ?Sized>(&self, palette: &P) -> ConvertOptions {
        let pw = palette.pixel_width();
        let ph = palette.pixel_height();

        ConvertOptions {
            max_width: self.max_columns.map(|n| n.saturating_mul(pw)),
            max_height: self.max_rows.map(|n| n.saturating_mul(ph)),
            scale_x: self.scale_x * f64::from(pw),
            scale_y: self.scale_y * f64::from(ph),
        }
    }
}

/// An SVG to bitmap converter.
///
/// The conversion pipeline is: parse, [`Fixup`], `usvg` tree, [`SizeCalculator`],
/// [`Rasterizer`]. Each step after parsing can be replaced via [`ConverterBuilder`].
///
/// The converter holds no mutable state, so a single instance
/// can be shared between threads.
pub struct Converter {
    usvg: usvg::Options<'static>,
    fixup: Box<dyn Fixup>,
    size_calculator: Box<dyn SizeCalculator>,
    rasterizer: Box<dyn Rasterizer>,
}

impl Default for Converter {
    fn default() -> Self {
        Converter::builder().build()
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("resources_dir", &self.usvg.resources_dir)
            .finish_non_exhaustive()
    }
}

impl Converter {
    /// Creates a converter with default steps.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with default steps.
    #[inline]
    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::default()
    }

    /// Returns `usvg` options used for parsing.
    #[inline]
    pub fn usvg_options(&self) -> &usvg::Options<'static> {
        &self.usvg
    }

    /// Converts an SVG string into a bitmap.
    pub fn convert_str(&self, text: &str, opt: &ConvertOptions) -> Result<Bitmap> {
        // Bad arguments must be reported before any parsing.
        opt.scale().validate()?;

        let tree = self.prepare(text)?;
        self.render(&tree, opt)
    }

    /// Converts an SVG data into a bitmap.
    ///
    /// Can contain an SVG string or a gzip compressed data.
    pub fn convert_data(&self, data: &[u8], opt: &ConvertOptions) -> Result<Bitmap> {
        opt.scale().validate()?;

        if data.starts_with(&[0x1f, 0x8b]) {
            let data = usvg::decompress_svgz(data)?;
            let text = std::str::from_utf8(&data).map_err(|_| Error::NotAnUtf8Str)?;
            self.convert_str(text, opt)
        } else {
            let text = std::str::from_utf8(data).map_err(|_| Error::NotAnUtf8Str)?;
            self.convert_str(text, opt)
        }
    }

    /// Converts an SVG or SVGZ file into a bitmap.
    ///
    /// Relative `href`s are resolved using `usvg::Options::resources_dir`.
    pub fn convert_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
        opt: &ConvertOptions,
    ) -> Result<Bitmap> {
        let data = std::fs::read(path)?;
        self.convert_data(&data, opt)
    }

    /// Converts an SVG string into a bitmap sized in palette characters.
    pub fn convert_for_palette<P: Palette + ?Sized>(
        &self,
        text: &str,
        palette: &P,
        opt: &PaletteOptions,
    ) -> Result<Bitmap> {
        self.convert_str(text, &opt.to_convert_options(palette))
    }

    /// Parses an SVG string and applies the fixup step.
    ///
    /// Returns a tree ready for rendering.
    pub fn prepare(&self, text: &str) -> Result<usvg::Tree> {
        let mut doc = Document::parse_str(text)?;
        self.fixup.apply(&mut doc);

        let svg = doc.to_svg_string();
        let tree = usvg::Tree::from_str(&svg, &self.usvg)?;
        Ok(tree)
    }

    /// Returns the bitmap size for a prepared tree.
    pub fn target_size(&self, tree: &usvg::Tree, opt: &ConvertOptions) -> Result<TargetSize> {
        let size = tree.size();
        self.size_calculator.calculate(
            (f64::from(size.width()), f64::from(size.height())),
            opt.limits(),
            opt.scale(),
        )
    }

    /// Renders a prepared tree.
    pub fn render(&self, tree: &usvg::Tree, opt: &ConvertOptions) -> Result<Bitmap> {
        let size = self.target_size(tree, opt)?;
        log::debug!(
            "Rendering {}x{} SVG into a {}x{} bitmap.",
            tree.size().width(),
            tree.size().height(),
            size.width,
            size.height
        );

        self.rasterizer.rasterize(tree, size)
    }
}

/// A [`Converter`] builder.
pub struct ConverterBuilder {
    usvg: usvg::Options<'static>,
    fixup: Box<dyn Fixup>,
    size_calculator: Box<dyn SizeCalculator>,
    rasterizer: Box<dyn Rasterizer>,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        ConverterBuilder {
            usvg: usvg::Options::default(),
            fixup: Box::new(WhitePaint),
            size_calculator: Box::new(AspectFit),
            rasterizer: Box::new(ResvgRasterizer::default()),
        }
    }
}

impl std::fmt::Debug for ConverterBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ConverterBuilder")
            .field("resources_dir", &self.usvg.resources_dir)
            .finish_non_exhaustive()
    }
}

impl ConverterBuilder {
    /// Sets `usvg` parsing options.
    pub fn usvg_options(mut self, opt: usvg::Options<'static>) -> Self {
        self.usvg = opt;
        self
    }

    /// Loads system fonts into the `usvg` fonts database.
    ///
    /// Without fonts, `text` elements are not rendered.
    #[cfg(feature = "system-fonts")]
    pub fn load_system_fonts(mut self) -> Self {
        self.usvg.fontdb_mut().load_system_fonts();
        self
    }

    /// Replaces the fixup step.
    pub fn fixup<F: Fixup + 'static>(mut self, fixup: F) -> Self {
        self.fixup = Box::new(fixup);
        self
    }

    /// Replaces the size calculation step.
    pub fn size_calculator<S: SizeCalculator + 'static>(mut self, calculator: S) -> Self {
        self.size_calculator = Box::new(calculator);
        self
    }

    /// Replaces the rasterization step.
    pub fn rasterizer<R: Rasterizer + 'static>(mut self, rasterizer: R) -> Self {
        self.rasterizer = Box::new(rasterizer);
        self
    }

    /// Creates a converter.
    pub fn build(self) -> Converter {
        Converter {
            usvg: self.usvg,
            fixup: self.fixup,
            size_calculator: self.size_calculator,
            rasterizer: self.rasterizer,
        }
    }
}
