//! ST7735 LCD Bring-up Driver
//!
//! Boot-time driver that takes an ST7735 TFT controller on an SPI bus from
//! power-on to a lit panel showing a diagnostic stripe pattern.
//!
//! ## Features
//!
//! - `no_std` compatible, no allocation
//! - `embedded-hal` v1.0 support
//! - Software chip select: one command or one pixel burst per window
//! - Power-on script as structured records or packed vendor tables
//! - Packed board configuration words decoded into a typed [`Config`]
//! - `embedded-graphics-core` colour and geometry types (with `graphics` feature)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::spi::SpiBus;
//! use st7735_boot::{
//!     halt_on_error, BaudDivisor, BoardPins, BringUp, Config, GpioPorts, PackedConfig, PinMode,
//!     Platform, Port,
//! };
//!
//! # #[derive(Clone)]
//! # struct Board;
//! # impl GpioPorts for Board {
//! #     fn set_mode(&mut self, _port: Port, _mask: u16, _mode: PinMode) {}
//! #     fn set_push_pull(&mut self, _port: Port, _mask: u16) {}
//! #     fn set(&mut self, _port: Port, _mask: u16) {}
//! #     fn clear(&mut self, _port: Port, _mask: u16) {}
//! # }
//! # impl Platform for Board {
//! #     fn enable_port_clock(&mut self, _port: Port) {}
//! #     fn enable_spi_clock(&mut self) {}
//! #     fn init_spi_master(&mut self, _divisor: BaudDivisor) {}
//! # }
//! # struct Spi2;
//! # impl embedded_hal::spi::ErrorType for Spi2 { type Error = Infallible; }
//! # impl SpiBus for Spi2 {
//! #     fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn write(&mut self, _words: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn transfer(&mut self, _r: &mut [u8], _w: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct SysTick;
//! # impl DelayNs for SysTick { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = SysTick;
//! let config = halt_on_error(Config::from_packed(PackedConfig::REFERENCE));
//!
//! let bring_up = BringUp::new(Board, Board, Spi2, BoardPins::REFERENCE, config);
//! let display = halt_on_error(bring_up.run(&mut delay));
//!
//! assert_eq!(display.dimensions().width, 160);
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

/// One-shot bring-up sequencer
pub mod bringup;
/// ST7735 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Hardware interface abstraction
pub mod interface;
/// Diagnostic stripe pattern
pub mod pattern;
/// Logical pins and GPIO access
pub mod pin;
/// Controller command scripts
pub mod sequence;

#[cfg(test)]
mod mock;

pub use bringup::{
    BoardDisplay, BoardInterface, BoardPins, BringUp, BringUpError, PRE_INIT_DELAY_MS, Platform,
    Stage,
};
pub use config::{BaudDivisor, Builder, Config, Dimensions, FrameRate, MAX_DIMENSION, PackedConfig};
pub use display::Display;
pub use error::{BuilderError, Error, halt, halt_on_error};
pub use interface::InterfaceError;
pub use interface::{CommandFrame, DisplayInterface, Interface, MAX_COMMAND_LEN, RESET_PULSE_MS};
pub use pattern::Stripes;
pub use pin::{Drive, GpioPorts, Line, Pin, PinBank, PinError, PinMode, Port, resolve_port};
pub use sequence::{Command, INIT_SEQUENCE, INIT_SEQUENCE_PACKED, PackedSequence, SequenceError};
