//! ST7735 command definitions
//!
//! This module defines the opcode bytes understood by the ST7735 family of
//! TFT LCD controllers. Commands are sent over SPI with the DC pin low for the
//! opcode and high for any argument bytes.
//!
//! ## Command Structure
//!
//! All commands follow the pattern:
//! 1. Assert CS (Chip Select)
//! 2. Set DC low (command mode)
//! 3. Send opcode byte
//! 4. Set DC high (data mode)
//! 5. Send argument bytes (if any)
//! 6. Deassert CS
//!
//! Opcode 0 ([`NOP`]) doubles as the end-of-sequence sentinel in command
//! tables, see [`crate::sequence`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use st7735_boot::{command, DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::OutputPin;
//! # use embedded_hal::spi::SpiBus;
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiBus for MockSpi {
//! #     fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn write(&mut self, _words: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn transfer(&mut self, _r: &mut [u8], _w: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # let mut interface = Interface::new(MockSpi, MockPin, MockPin, None::<MockPin>);
//! // Leave sleep mode
//! let _ = interface.send_command(command::SLPOUT, &[]);
//!
//! // 16-bit colour
//! let _ = interface.send_command(command::COLMOD, &[0x05]);
//! ```

// System control commands

/// No operation (0x00)
///
/// Never sent; marks the end of a command sequence.
pub const NOP: u8 = 0x00;

/// Software reset (0x01)
///
/// Resets registers to their defaults. Wait 120ms before the next command.
pub const SWRESET: u8 = 0x01;

/// Read display ID (0x04)
pub const RDDID: u8 = 0x04;

/// Read display status (0x09)
pub const RDDST: u8 = 0x09;

/// Sleep in (0x10)
pub const SLPIN: u8 = 0x10;

/// Sleep out (0x11)
///
/// Starts the booster and oscillator. Wait 120ms before the next command.
pub const SLPOUT: u8 = 0x11;

/// Partial mode on (0x12)
pub const PTLON: u8 = 0x12;

/// Normal display mode on (0x13)
pub const NORON: u8 = 0x13;

/// Display inversion off (0x20)
pub const INVOFF: u8 = 0x20;

/// Display inversion on (0x21)
pub const INVON: u8 = 0x21;

/// Display off (0x28)
pub const DISPOFF: u8 = 0x28;

/// Display on (0x29)
pub const DISPON: u8 = 0x29;

// Frame memory commands

/// Column address set (0x2A)
///
/// Requires 4 bytes: [start_MSB, start_LSB, end_MSB, end_LSB]
pub const CASET: u8 = 0x2A;

/// Row address set (0x2B)
///
/// Requires 4 bytes: [start_MSB, start_LSB, end_MSB, end_LSB]
pub const RASET: u8 = 0x2B;

/// Memory write (0x2C)
///
/// Followed by pixel data for the current address window, 2 bytes per
/// pixel (big-endian RGB565) in 16-bit colour mode.
pub const RAMWR: u8 = 0x2C;

/// Memory read (0x2E)
pub const RAMRD: u8 = 0x2E;

/// Partial area (0x30)
pub const PTLAR: u8 = 0x30;

/// Interface pixel format (0x3A)
///
/// Requires 1 byte: 0x03 = 12-bit, 0x05 = 16-bit, 0x06 = 18-bit
pub const COLMOD: u8 = 0x3A;

/// Memory data access control (0x36)
///
/// Requires 1 byte of orientation / colour order bits:
/// - 0x80 (MY): row address order
/// - 0x40 (MX): column address order
/// - 0x20 (MV): row/column exchange
/// - 0x10 (ML): vertical refresh order
/// - 0x08 (RGB): BGR colour order
/// - 0x04 (MH): horizontal refresh order
pub const MADCTL: u8 = 0x36;

// Panel timing and power commands

/// Frame rate control, normal mode (0xB1)
///
/// Takes 3 bytes (RTNA, FPA, BPA). Some panels accept a 2 byte short form.
pub const FRMCTR1: u8 = 0xB1;

/// Frame rate control, idle mode (0xB2)
pub const FRMCTR2: u8 = 0xB2;

/// Frame rate control, partial mode (0xB3)
pub const FRMCTR3: u8 = 0xB3;

/// Display inversion control (0xB4)
pub const INVCTR: u8 = 0xB4;

/// Display function setting (0xB6)
pub const DISSET5: u8 = 0xB6;

/// Power control 1 (0xC0)
pub const PWCTR1: u8 = 0xC0;

/// Power control 2 (0xC1)
pub const PWCTR2: u8 = 0xC1;

/// Power control 3 (0xC2)
pub const PWCTR3: u8 = 0xC2;

/// Power control 4 (0xC3)
pub const PWCTR4: u8 = 0xC3;

/// Power control 5 (0xC4)
pub const PWCTR5: u8 = 0xC4;

/// VCOM control 1 (0xC5)
pub const VMCTR1: u8 = 0xC5;

/// Read ID1 (0xDA)
pub const RDID1: u8 = 0xDA;

/// Read ID2 (0xDB)
pub const RDID2: u8 = 0xDB;

/// Read ID3 (0xDC)
pub const RDID3: u8 = 0xDC;

/// Read ID4 (0xDD)
pub const RDID4: u8 = 0xDD;

/// Power control 6 (0xFC)
pub const PWCTR6: u8 = 0xFC;

/// Positive gamma correction (0xE0)
///
/// Requires 16 bytes.
pub const GMCTRP1: u8 = 0xE0;

/// Negative gamma correction (0xE1)
///
/// Requires 16 bytes.
pub const GMCTRN1: u8 = 0xE1;
