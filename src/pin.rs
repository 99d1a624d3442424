//! Logical pin abstraction
//!
//! Board wiring is described with compact logical pin identifiers: the high nibble
//! selects the GPIO port and the low nibble the bit within it, so `0x1C` is port B,
//! bit 12 (`PB12`). This module resolves those identifiers to a [`Port`] and bit
//! mask and drives them through a platform-provided [`GpioPorts`] implementation.
//!
//! Only ports A, B and C exist on the reference board. Any other port index is a
//! wiring mistake and surfaces as [`PinError::UnknownPort`].
//!
//! ## Example
//!
//! ```
//! use st7735_boot::pin::{resolve_port, Pin, PinError, Port};
//!
//! assert_eq!(resolve_port(Pin::PB12), Ok(Port::B));
//! assert_eq!(Pin::PB12.mask(), 1 << 12);
//!
//! let bogus = Pin::from_raw(0x3A);
//! assert_eq!(resolve_port(bogus), Err(PinError::UnknownPort { pin: 0x3A }));
//! ```

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, PinState};

/// GPIO ports known to the board
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Port {
    /// GPIOA
    A,
    /// GPIOB
    B,
    /// GPIOC
    C,
}

/// Packed logical pin identifier `{port << 4 | bit}`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pin(u8);

impl Pin {
    /// Backlight enable on the reference board
    pub const PA4: Self = Self::new(0, 4);
    /// Chip select on the reference board
    pub const PB12: Self = Self::new(1, 12);
    /// SPI2 clock on the reference board
    pub const PB13: Self = Self::new(1, 13);
    /// SPI2 data in (MISO) on the reference board
    pub const PB14: Self = Self::new(1, 14);
    /// SPI2 data out (MOSI) on the reference board
    pub const PB15: Self = Self::new(1, 15);
    /// Controller reset on the reference board
    pub const PC4: Self = Self::new(2, 4);
    /// Data/command select on the reference board
    pub const PC5: Self = Self::new(2, 5);

    /// Pack a port index and bit number into a logical pin
    ///
    /// Bits above the low nibble of `bit` are discarded.
    pub const fn new(port_index: u8, bit: u8) -> Self {
        Self((port_index << 4) | (bit & 0x0F))
    }

    /// Wrap a raw packed identifier without validation
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// The raw packed identifier
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Port index encoded in the high nibble
    pub const fn port_index(self) -> u8 {
        self.0 >> 4
    }

    /// Single-bit mask for this pin within its port
    pub const fn mask(self) -> u16 {
        1 << (self.0 & 0x0F)
    }
}

/// Resolve a logical pin to its GPIO port
///
/// # Errors
///
/// Returns [`PinError::UnknownPort`] if the high nibble is not 0 (A), 1 (B) or 2 (C).
pub fn resolve_port(pin: Pin) -> Result<Port, PinError> {
    match pin.port_index() {
        0 => Ok(Port::A),
        1 => Ok(Port::B),
        2 => Ok(Port::C),
        _ => Err(PinError::UnknownPort { pin: pin.raw() }),
    }
}

/// Errors from logical pin resolution
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinError {
    /// The pin's port index does not name a port on this board
    UnknownPort {
        /// Raw packed pin identifier
        pin: u8,
    },
}

impl core::fmt::Display for PinError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownPort { pin } => write!(f, "Unknown GPIO port for pin {pin:#04x}"),
        }
    }
}

impl core::error::Error for PinError {}

/// Pin function
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinMode {
    /// General purpose output
    Output,
    /// Alternate function with the given function number (e.g. AF5 for SPI2)
    Alternate(u8),
}

/// Output stage configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Drive {
    /// Push-pull output stage
    PushPull,
    /// Pin is read by the MCU; output options are left untouched
    Input,
}

/// Platform GPIO primitives operating on a port and bit mask
///
/// Implemented by the board support layer. All operations are assumed to succeed.
/// Implementations are usually zero-sized handles to the GPIO register blocks,
/// which is why [`Line`] requires `Clone`.
pub trait GpioPorts {
    /// Program the pin function (direction / alternate function) for `mask`
    fn set_mode(&mut self, port: Port, mask: u16, mode: PinMode);
    /// Configure the pins in `mask` as push-pull outputs
    fn set_push_pull(&mut self, port: Port, mask: u16);
    /// Drive the pins in `mask` high
    fn set(&mut self, port: Port, mask: u16);
    /// Drive the pins in `mask` low
    fn clear(&mut self, port: Port, mask: u16);
}

/// Logical pin front-end over a [`GpioPorts`] implementation
#[derive(Clone, Debug)]
pub struct PinBank<G> {
    ports: G,
}

impl<G: GpioPorts> PinBank<G> {
    /// Wrap the platform GPIO primitives
    pub fn new(ports: G) -> Self {
        Self { ports }
    }

    /// Configure a pin's mode and output stage
    ///
    /// # Errors
    ///
    /// Returns [`PinError::UnknownPort`] without touching hardware if the pin
    /// does not resolve.
    pub fn configure_pin(&mut self, pin: Pin, mode: PinMode, drive: Drive) -> Result<(), PinError> {
        let port = resolve_port(pin)?;
        self.ports.set_mode(port, pin.mask(), mode);
        if drive == Drive::PushPull {
            self.ports.set_push_pull(port, pin.mask());
        }
        Ok(())
    }

    /// Drive a pin high or low
    ///
    /// # Errors
    ///
    /// Returns [`PinError::UnknownPort`] if the pin does not resolve.
    pub fn set_pin(&mut self, pin: Pin, level: PinState) -> Result<(), PinError> {
        let port = resolve_port(pin)?;
        match level {
            PinState::High => self.ports.set(port, pin.mask()),
            PinState::Low => self.ports.clear(port, pin.mask()),
        }
        Ok(())
    }
}

impl<G: GpioPorts + Clone> PinBank<G> {
    /// Resolve a pin once and hand out an [`OutputPin`] for it
    ///
    /// # Errors
    ///
    /// Returns [`PinError::UnknownPort`] if the pin does not resolve.
    pub fn output(&self, pin: Pin) -> Result<Line<G>, PinError> {
        Ok(Line {
            ports: self.ports.clone(),
            port: resolve_port(pin)?,
            mask: pin.mask(),
        })
    }
}

/// A resolved output line
///
/// Used for chip select, data/command select, reset and backlight.
#[derive(Clone, Debug)]
pub struct Line<G> {
    ports: G,
    port: Port,
    mask: u16,
}

impl<G> ErrorType for Line<G> {
    type Error = Infallible;
}

impl<G: GpioPorts> OutputPin for Line<G> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.ports.clear(self.port, self.mask);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.ports.set(self.port, self.mask);
        Ok(())
    }
}
