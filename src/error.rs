//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during bring-up and display operations
//! - [`PinError`](crate::pin::PinError) - Logical pin does not resolve to a known port
//! - [`SequenceError`](crate::sequence::SequenceError) - Malformed packed command table
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! There is no recovery path during boot. Every error is fatal to the bring-up
//! that produced it; callers without a supervisor can hand the result to
//! [`halt_on_error`], which logs the fault and never returns.
//!
//! ## Example
//!
//! ```
//! use st7735_boot::{Builder, BuilderError, Dimensions};
//!
//! // Missing dimensions
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Invalid dimensions
//! let result = Dimensions::new(200, 128); // Wider than the frame memory
//! assert!(result.is_err());
//! ```

use core::fmt::Debug;

use crate::interface::DisplayInterface;
use crate::pin::PinError;
use crate::sequence::SequenceError;

/// Longest side of the ST7735 frame memory (132 x 162 pixels)
///
/// NOTE: The row/column exchange bit in MADCTL lets either axis use the long side,
/// so width and height share the same bound.
pub const MAX_DIMENSION: u16 = 162;

/// Errors that can occur when bringing up or driving the display
///
/// Generic over the interface type to preserve the specific error type.
/// This allows error handling code to match on the underlying hardware error.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/GPIO)
    ///
    /// Wraps the underlying hardware error from the [`DisplayInterface`] implementation.
    Interface(I::Error),
    /// A logical pin names a port the board does not have
    ///
    /// Raised before any bus traffic, so the controller is never left half-initialised.
    Pin(PinError),
    /// A packed command table ended in the middle of a descriptor
    Sequence(SequenceError),
    /// Invalid address window parameters
    ///
    /// The window must have non-zero width and height, and its inclusive end
    /// coordinates must fit in 16 bits.
    InvalidAddressWindow {
        /// X coordinate
        x: u16,
        /// Y coordinate
        y: u16,
        /// Width
        w: u16,
        /// Height
        h: u16,
    },
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::Pin(e) => write!(f, "{e}"),
            Self::Sequence(e) => write!(f, "{e}"),
            Self::InvalidAddressWindow { x, y, w, h } => {
                write!(f, "Invalid address window: x={x}, y={y}, w={w}, h={h}")
            }
        }
    }
}

impl<I: DisplayInterface + Debug> core::error::Error for Error<I> {}

impl<I: DisplayInterface> From<PinError> for Error<I> {
    fn from(e: PinError) -> Self {
        Self::Pin(e)
    }
}

impl<I: DisplayInterface> From<SequenceError> for Error<I> {
    fn from(e: SequenceError) -> Self {
        Self::Sequence(e)
    }
}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the display is created.
#[derive(Debug, PartialEq)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called
    /// before building.
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Width in pixels requested
        width: u16,
        /// Height in pixels requested
        height: u16,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Dimensions must be specified"),
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {width}x{height} (each side must be 1..={MAX_DIMENSION})"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}

/// Unwrap a bring-up result or stop the core
///
/// Logs the fault at error level and spins forever. Intended for boot code that
/// has no supervisor to report to; an attached debugger or watchdog observes the
/// halt. Execution never continues past a fault with partially initialised hardware.
pub fn halt_on_error<T, E: core::fmt::Display>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::error!("display bring-up failed: {e}");
            halt()
        }
    }
}

/// Spin forever
pub fn halt() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
