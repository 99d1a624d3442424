//! Diagnostic stripe pattern
//!
//! Column `i` is painted with the raw 16-bit value `2 * i` on every row, which
//! shows up as a ramp of vertical colour stripes. Pixels are produced in the
//! order the controller consumes them after a memory write with the reference
//! MADCTL: all rows of column 0, then all rows of column 1, and so on.
//!
//! ## Example
//!
//! ```
//! use st7735_boot::{Dimensions, Stripes};
//!
//! let dims = match Dimensions::new(3, 2) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let pixels: Vec<u16> = Stripes::new(dims).collect();
//! assert_eq!(pixels, [0, 0, 2, 2, 4, 4]);
//! ```

use core::iter::FusedIterator;

use crate::config::Dimensions;

/// Column-major iterator over the stripe pattern
#[derive(Clone, Debug)]
pub struct Stripes {
    height: u16,
    column: u16,
    row: u16,
    remaining: usize,
}

impl Stripes {
    /// Pattern covering `dims`
    pub fn new(dims: Dimensions) -> Self {
        Self {
            height: dims.height,
            column: 0,
            row: 0,
            remaining: dims.pixel_count(),
        }
    }

    /// Raw pixel value for a column
    pub const fn column_value(column: u16) -> u16 {
        column.wrapping_mul(2)
    }
}

impl Iterator for Stripes {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        if self.remaining == 0 {
            return None;
        }
        let value = Self::column_value(self.column);
        self.remaining -= 1;
        self.row += 1;
        if self.row == self.height {
            self.row = 0;
            self.column = self.column.wrapping_add(1);
        }
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Stripes {}

impl FusedIterator for Stripes {}

#[cfg(feature = "graphics")]
mod graphics {
    use embedded_graphics_core::geometry::Size;
    use embedded_graphics_core::pixelcolor::Rgb565;
    use embedded_graphics_core::pixelcolor::raw::RawU16;

    use super::Stripes;
    use crate::config::Dimensions;

    impl Stripes {
        /// The same pattern as RGB565 colours
        pub fn colors(self) -> impl Iterator<Item = Rgb565> {
            self.map(|raw| Rgb565::from(RawU16::new(raw)))
        }
    }

    impl From<Dimensions> for Size {
        fn from(dims: Dimensions) -> Self {
            Size::new(u32::from(dims.width), u32::from(dims.height))
        }
    }
}
