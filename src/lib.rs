// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svgbox` rasterizes SVG documents into bitmaps for box-drawing text renderers.

A box-drawing renderer maps blocks of pixels onto Unicode characters,
so it needs a bitmap of a very specific size: a number of characters
multiplied by the palette block size, stretched to compensate non-square
terminal cells. `svgbox` computes that size, makes the SVG visible
in monochrome and delegates the actual rendering to [resvg].

## Example

```no_run
use svgbox::{BitmapSource, BlockPalette, Converter, PaletteOptions};

let svg = std::fs::read_to_string("icon.svg").unwrap();
let converter = Converter::new();
let opt = PaletteOptions {
    max_columns: Some(40),
    ..PaletteOptions::default()
};
let bitmap = converter
    .convert_for_palette(&svg, &BlockPalette::BRAILLE, &opt)
    .unwrap();
println!("{}x{}", bitmap.width(), bitmap.height());
```

[resvg]: https://github.com/RazrFalcon/resvg
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(clippy::uninlined_format_args)]

pub use resvg;
pub use rgb::RGBA8;
pub use tiny_skia;
pub use usvg;

mod bitmap;
mod converter;
mod dimensions;
pub mod document;
mod error;
mod fixup;
pub mod paint;
mod palette;
mod rasterizer;
mod writer;

pub use bitmap::{Bitmap, BitmapSource};
pub use converter::{ConvertOptions, Converter, ConverterBuilder, PaletteOptions};
pub use dimensions::{fit, AspectFit, Scale, SizeCalculator, SizeLimits, TargetSize};
pub use document::Document;
pub use error::{Error, Result};
pub use fixup::{Fixup, KeepPaint, WhitePaint};
pub use paint::{Paint, PaintValue};
pub use palette::{BlockPalette, Palette};
pub use rasterizer::{Rasterizer, ResvgRasterizer};
