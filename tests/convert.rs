// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use once_cell::sync::Lazy;
use svgbox::{
    BitmapSource, BlockPalette, ConvertOptions, Converter, Error, KeepPaint, PaletteOptions,
    TargetSize, RGBA8,
};

static CONVERTER: Lazy<Converter> = Lazy::new(Converter::new);

const WHITE: RGBA8 = RGBA8 {
    r: 255,
    g: 255,
    b: 255,
    a: 255,
};

fn opt(
    max_width: Option<u32>,
    max_height: Option<u32>,
    scale_x: f64,
    scale_y: f64,
) -> ConvertOptions {
    ConvertOptions {
        max_width,
        max_height,
        scale_x,
        scale_y,
    }
}

#[test]
fn square_into_wide_cells() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg' width='1024' height='1024'/>";
    let bitmap = CONVERTER
        .convert_str(svg, &opt(Some(80), None, 2.0, 1.0))
        .unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (80, 40));
}

#[test]
fn intrinsic_size_without_caps() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg' width='100' height='50'/>";
    let bitmap = CONVERTER
        .convert_str(svg, &ConvertOptions::default())
        .unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (100, 50));
}

#[test]
fn view_box_size() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 10 20'/>";
    let bitmap = CONVERTER
        .convert_str(svg, &opt(None, Some(10), 1.0, 1.0))
        .unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (5, 10));
}

#[test]
fn braille_rows() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg' width='30' height='40'/>";
    let palette_opt = PaletteOptions {
        max_rows: Some(10),
        ..PaletteOptions::default()
    };

    let bitmap = CONVERTER
        .convert_for_palette(svg, &BlockPalette::BRAILLE, &palette_opt)
        .unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (30, 40));
}

#[test]
fn half_block_columns() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg' width='100' height='100'/>";
    let palette_opt = PaletteOptions {
        max_columns: Some(20),
        ..PaletteOptions::default()
    };

    // Stretched to 200x200, then fitted into 20 pixels wide.
    let bitmap = CONVERTER
        .convert_for_palette(svg, &BlockPalette::HALF, &palette_opt)
        .unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (20, 20));
}

#[test]
fn invalid_scale_is_checked_first() {
    let res = CONVERTER.convert_str("<svg", &opt(None, None, 0.0, 1.0));
    assert!(matches!(res, Err(Error::InvalidArgument(_))));

    let res = CONVERTER.convert_str("<svg", &opt(None, None, 1.0, f64::NAN));
    assert!(matches!(res, Err(Error::InvalidArgument(_))));

    let res = CONVERTER.convert_data(&[0xff, 0xfe], &opt(None, None, -1.0, 1.0));
    assert!(matches!(res, Err(Error::InvalidArgument(_))));
}

#[test]
fn zero_cap() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'/>";
    let res = CONVERTER.convert_str(svg, &opt(Some(0), None, 1.0, 1.0));
    assert!(matches!(res, Err(Error::InvalidArgument(_))));
}

#[test]
fn malformed_xml() {
    let res = CONVERTER.convert_str("<svg", &ConvertOptions::default());
    assert!(matches!(res, Err(Error::ParsingFailed(_))));
}

#[test]
fn not_an_svg() {
    let res = CONVERTER.convert_str("<html/>", &ConvertOptions::default());
    assert!(matches!(res, Err(Error::ParsingFailed(_))));
}

#[test]
fn not_utf8() {
    let res = CONVERTER.convert_data(&[b'<', 0xff, 0xfe, b'>'], &ConvertOptions::default());
    assert!(matches!(res, Err(Error::NotAnUtf8Str)));
}

#[test]
fn malformed_gzip() {
    let res = CONVERTER.convert_data(&[0x1f, 0x8b, 0x00, 0x01], &ConvertOptions::default());
    assert!(matches!(res, Err(Error::MalformedGZip)));
}

#[test]
fn missing_file() {
    let res = CONVERTER.convert_file("does-not-exist.svg", &ConvertOptions::default());
    assert!(matches!(res, Err(Error::Io(_))));
}

#[test]
fn unpainted_shapes_become_white() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' width='20' height='20'>
        <rect width='10' height='20'/>
        <rect x='12' y='2' width='6' height='16' fill='none' stroke-width='1'/>
    </svg>
    ";

    let bitmap = CONVERTER
        .convert_str(svg, &ConvertOptions::default())
        .unwrap();

    assert_eq!(bitmap.pixel(5, 10), Some(WHITE));
    // `fill='none'` stays none, while the unset stroke is painted.
    assert_eq!(bitmap.pixel(15, 10).map(|c| c.a), Some(0));
    assert!(bitmap.pixel(12, 10).map(|c| c.a).unwrap_or(0) > 0);
}

#[test]
fn explicit_colors_are_kept() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'>
        <rect width='10' height='10' fill='#ff0000'/>
    </svg>
    ";

    let bitmap = CONVERTER
        .convert_str(svg, &ConvertOptions::default())
        .unwrap();
    assert_eq!(bitmap.pixel(5, 5), Some(RGBA8::new(255, 0, 0, 255)));
}

#[test]
fn inherited_paint_is_kept() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'>
        <g fill='#0000ff'>
            <rect width='10' height='10'/>
        </g>
    </svg>
    ";

    let bitmap = CONVERTER
        .convert_str(svg, &ConvertOptions::default())
        .unwrap();
    assert_eq!(bitmap.pixel(5, 5), Some(RGBA8::new(0, 0, 255, 255)));
}

#[test]
fn keep_paint() {
    let converter = Converter::builder().fixup(KeepPaint).build();
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'>
        <rect width='10' height='10'/>
    </svg>
    ";

    let bitmap = converter
        .convert_str(svg, &ConvertOptions::default())
        .unwrap();
    assert_eq!(bitmap.pixel(5, 5), Some(RGBA8::new(0, 0, 0, 255)));
}

#[test]
fn custom_size_calculator() {
    let converter = Converter::builder()
        .size_calculator(
            |_: (f64, f64), _: svgbox::SizeLimits, _: svgbox::Scale| -> svgbox::Result<TargetSize> {
                Ok(TargetSize::new(3, 7))
            },
        )
        .build();

    let svg = "<svg xmlns='http://www.w3.org/2000/svg' width='100' height='100'/>";
    let bitmap = converter
        .convert_str(svg, &ConvertOptions::default())
        .unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (3, 7));
}

#[test]
fn custom_rasterizer() {
    let converter = Converter::builder()
        .rasterizer(
            |_: &svgbox::usvg::Tree, size: TargetSize| -> svgbox::Result<svgbox::Bitmap> {
                Err(Error::RenderingFailed(format!("{}x{}", size.width, size.height)))
            },
        )
        .build();

    let svg = "<svg xmlns='http://www.w3.org/2000/svg' width='8' height='4'/>";
    match converter.convert_str(svg, &ConvertOptions::default()) {
        Err(Error::RenderingFailed(msg)) => assert_eq!(msg, "8x4"),
        res => panic!("unexpected result: {:?}", res),
    }
}

#[test]
fn release() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg' width='4' height='4'/>";
    let bitmap = CONVERTER
        .convert_str(svg, &ConvertOptions::default())
        .unwrap();
    assert_eq!(bitmap.to_rgba().len(), 16);
    bitmap.release();
}

#[test]
fn pixel_out_of_bounds() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' width='4' height='2'>
        <rect y='1' width='4' height='1' stroke='none'/>
    </svg>
    ";

    let bitmap = CONVERTER
        .convert_str(svg, &ConvertOptions::default())
        .unwrap();

    assert_eq!(bitmap.pixel(0, 0).map(|c| c.a), Some(0));
    assert_eq!(bitmap.pixel(0, 1), Some(WHITE));
    // Must not wrap into the next row.
    assert_eq!(bitmap.pixel(4, 0), None);
    assert_eq!(bitmap.pixel(7, 0), None);
    assert_eq!(bitmap.pixel(0, 2), None);
}
