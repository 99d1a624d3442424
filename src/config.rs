//! Display configuration types and builder
//!
//! Boards describe their panel with a handful of packed words (see
//! [`PackedConfig`]). They are decoded exactly once, at the board boundary, into
//! a [`Config`] with named fields; nothing downstream masks or shifts bits.

pub use crate::error::{BuilderError, MAX_DIMENSION};

/// Display dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels (columns streamed per frame)
    pub width: u16,
    /// Height in pixels (rows per column)
    pub height: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if either side is zero or
    /// larger than [`MAX_DIMENSION`].
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || width > MAX_DIMENSION || height == 0 || height > MAX_DIMENSION {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of pixels in one frame
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bytes streamed for one frame at 16 bits per pixel
    pub fn frame_bytes(&self) -> usize {
        self.pixel_count() * 2
    }
}

/// Frame rate control (FRMCTR1) arguments
///
/// Decoded from a packed timing word `0x00_AA_BB_CC` into the argument bytes
/// `[AA, BB, CC]`. When the last byte is [`FrameRate::SHORT_FORM`] only the
/// first two are sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRate([u8; 3]);

impl FrameRate {
    /// Last-byte value that selects the two byte form
    pub const SHORT_FORM: u8 = 0xFF;

    /// Decode a packed timing word
    pub const fn from_word(word: u32) -> Self {
        Self([(word >> 16) as u8, (word >> 8) as u8, word as u8])
    }

    /// The timing word this was decoded from
    pub const fn word(&self) -> u32 {
        ((self.0[0] as u32) << 16) | ((self.0[1] as u32) << 8) | self.0[2] as u32
    }

    /// Argument bytes as sent on the wire
    pub fn args(&self) -> &[u8] {
        if self.0[2] == Self::SHORT_FORM {
            &self.0[..2]
        } else {
            &self.0
        }
    }
}

/// SPI clock prescaler applied to the peripheral clock
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BaudDivisor {
    /// fPCLK / 2
    Div2,
    /// fPCLK / 4
    Div4,
    /// fPCLK / 8
    #[default]
    Div8,
    /// fPCLK / 16
    Div16,
    /// fPCLK / 32
    Div32,
    /// fPCLK / 64
    Div64,
    /// fPCLK / 128
    Div128,
    /// fPCLK / 256
    Div256,
}

impl BaudDivisor {
    /// Numeric divisor
    pub fn value(self) -> u16 {
        match self {
            Self::Div2 => 2,
            Self::Div4 => 4,
            Self::Div8 => 8,
            Self::Div16 => 16,
            Self::Div32 => 32,
            Self::Div64 => 64,
            Self::Div128 => 128,
            Self::Div256 => 256,
        }
    }
}

/// Display configuration
///
/// This struct holds all configurable parameters for the ST7735 controller.
/// Use `Builder` or [`Config::from_packed`] to create a Config.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Display dimensions
    pub dimensions: Dimensions,
    /// Memory data access control byte (orientation and colour order)
    pub madctl: u8,
    /// Column offset of the visible area within frame memory
    pub offset_x: u16,
    /// Row offset of the visible area within frame memory
    pub offset_y: u16,
    /// Whether palette colours are inverted before being sent
    pub invert_colors: bool,
    /// Frame rate control arguments
    pub frame_rate: FrameRate,
    /// SPI clock prescaler
    pub spi_divisor: BaudDivisor,
    /// Nominal SPI clock in MHz (diagnostic only)
    pub spi_mhz: u8,
}

impl Config {
    /// Mask to XOR into 24-bit palette entries
    ///
    /// `0xFFFFFF` for inverted panels, `0` otherwise.
    pub fn palette_xor(&self) -> u32 {
        if self.invert_colors { 0x00FF_FFFF } else { 0 }
    }

    /// Decode packed board words
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if the packed width or height is invalid.
    pub fn from_packed(packed: PackedConfig) -> Result<Self, BuilderError> {
        let cfg0 = packed.cfg0;
        Builder::new()
            .dimensions(Dimensions::new(packed.width, packed.height)?)
            .madctl(cfg0 as u8)
            .offset(((cfg0 >> 8) & 0xFF) as u16, ((cfg0 >> 16) & 0xFF) as u16)
            .invert_colors(cfg0 & PackedConfig::INVERT_BIT != 0)
            .frame_rate(FrameRate::from_word(packed.cfg1))
            .spi_divisor(packed.spi_divisor)
            .spi_mhz(packed.cfg2 as u8)
            .build()
    }
}

/// Board configuration words as stored in board support data
///
/// - `cfg0`: bits 0-7 MADCTL, 8-15 column offset, 16-23 row offset,
///   bit 24 colour inversion
/// - `cfg1`: frame rate control timing word (see [`FrameRate`])
/// - `cfg2`: bits 0-7 nominal SPI clock in MHz
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackedConfig {
    /// Orientation, offsets and inversion
    pub cfg0: u32,
    /// Frame rate timing word
    pub cfg1: u32,
    /// SPI clock
    pub cfg2: u32,
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// SPI clock prescaler
    pub spi_divisor: BaudDivisor,
}

impl PackedConfig {
    /// Colour inversion flag in `cfg0`
    pub const INVERT_BIT: u32 = 1 << 24;

    /// 160x128 landscape panel on the reference board
    pub const REFERENCE: Self = Self {
        cfg0: 0x0000_0080,
        cfg1: 0x00_06_03,
        cfg2: 22,
        width: 160,
        height: 128,
        spi_divisor: BaudDivisor::Div8,
    };
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust,no_run
/// use st7735_boot::{Builder, Dimensions, FrameRate};
///
/// let dims = match Dimensions::new(160, 128) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new()
///     .dimensions(dims)
///     .madctl(0x60)
///     .frame_rate(FrameRate::from_word(0x01_2C_2D))
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let _ = config;
/// ```
#[must_use]
pub struct Builder {
    /// Display dimensions (required)
    dimensions: Option<Dimensions>,
    /// Memory data access control byte
    madctl: u8,
    /// Column offset
    offset_x: u16,
    /// Row offset
    offset_y: u16,
    /// Palette inversion
    invert_colors: bool,
    /// Frame rate control arguments
    frame_rate: FrameRate,
    /// SPI clock prescaler
    spi_divisor: BaudDivisor,
    /// Nominal SPI clock in MHz
    spi_mhz: u8,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            dimensions: None,
            // Row address order flipped (MY), RGB
            madctl: 0x80,
            offset_x: 0,
            offset_y: 0,
            invert_colors: false,
            frame_rate: FrameRate::from_word(0x00_06_03),
            spi_divisor: BaudDivisor::Div8,
            spi_mhz: 22,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set the MADCTL byte
    pub fn madctl(mut self, value: u8) -> Self {
        self.madctl = value;
        self
    }

    /// Set the visible area offset within frame memory
    pub fn offset(mut self, x: u16, y: u16) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    /// Set palette inversion
    pub fn invert_colors(mut self, value: bool) -> Self {
        self.invert_colors = value;
        self
    }

    /// Set frame rate control arguments
    pub fn frame_rate(mut self, value: FrameRate) -> Self {
        self.frame_rate = value;
        self
    }

    /// Set the SPI clock prescaler
    pub fn spi_divisor(mut self, value: BaudDivisor) -> Self {
        self.spi_divisor = value;
        self
    }

    /// Set the nominal SPI clock reported in logs
    pub fn spi_mhz(mut self, value: u8) -> Self {
        self.spi_mhz = value;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set
    pub fn build(self) -> Result<Config, BuilderError> {
        Ok(Config {
            dimensions: self.dimensions.ok_or(BuilderError::MissingDimensions)?,
            madctl: self.madctl,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
            invert_colors: self.invert_colors,
            frame_rate: self.frame_rate,
            spi_divisor: self.spi_divisor,
            spi_mhz: self.spi_mhz,
        })
    }
}
