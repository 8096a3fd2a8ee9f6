// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// A box-drawing palette granularity.
///
/// Each character of a palette represents a block of
/// `pixel_width` x `pixel_height` sub-pixels.
pub trait Palette {
    /// Number of horizontal pixels per character.
    fn pixel_width(&self) -> u32;

    /// Number of vertical pixels per character.
    fn pixel_height(&self) -> u32;
}

/// A plain palette descriptor.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BlockPalette {
    /// Number of horizontal pixels per character.
    pub pixel_width: u32,
    /// Number of vertical pixels per character.
    pub pixel_height: u32,
}

impl BlockPalette {
    /// `█`, one pixel per character.
    pub const FULL: BlockPalette = BlockPalette::new(1, 1);
    /// `▀`/`▄`, two vertical pixels per character.
    pub const HALF: BlockPalette = BlockPalette::new(1, 2);
    /// `▘`/`▝`/`▖`/`▗` and friends, 2x2 pixels per character.
    pub const QUADRANT: BlockPalette = BlockPalette::new(2, 2);
    /// Legacy computing sextants, 2x3 pixels per character.
    pub const SEXTANT: BlockPalette = BlockPalette::new(2, 3);
    /// Braille patterns, 2x4 pixels per character.
    pub const BRAILLE: BlockPalette = BlockPalette::new(2, 4);

    /// Creates a new palette descriptor.
    #[inline]
    pub const fn new(pixel_width: u32, pixel_height: u32) -> Self {
        BlockPalette {
            pixel_width,
            pixel_height,
        }
    }
}

impl Palette for BlockPalette {
    #[inline]
    fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    #[inline]
    fn pixel_height(&self) -> u32 {
        self.pixel_height
    }
}

impl std::str::FromStr for BlockPalette {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "full" => Ok(BlockPalette::FULL),
            "half" => Ok(BlockPalette::HALF),
            "quadrant" => Ok(BlockPalette::QUADRANT),
            "sextant" => Ok(BlockPalette::SEXTANT),
            "braille" => Ok(BlockPalette::BRAILLE),
            _ => Err("invalid palette name"),
        }
    }
}
