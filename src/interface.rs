//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for communicating with the ST7735 controller over SPI.
//!
//! ## Hardware Requirements
//!
//! The ST7735 requires:
//! - SPI bus (MOSI + SCK). MISO may be wired but is never read.
//! - 2 or 3 GPIO outputs:
//!   - **CS**: Chip select (active low), driven by software
//!   - **DC**: Data/Command select (low=command, high=data)
//!   - **RST**: Reset (active low, optional)
//!
//! Chip select is toggled by the driver rather than by the SPI peripheral, so
//! the interface takes an [`SpiBus`] instead of an `SpiDevice`. Each command
//! occupies exactly one chip-select window, and a memory write keeps the window
//! open for the whole pixel burst.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::SpiBus;
//! use st7735_boot::{DisplayInterface, Interface};
//! # use core::convert::Infallible;
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
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! // Create interface with SPI bus, CS, DC and an optional reset line
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin, Some(MockPin));
//!
//! // Pulse reset
//! let _ = interface.reset(&mut delay);
//!
//! // Send command with arguments
//! let _ = interface.send_command(0x3A, &[0x05]); // 16-bit colour
//!
//! // Stream two pixels after a memory write opcode
//! let _ = interface.write_memory(0x2C, [0xF800, 0x07E0]);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

type InterfaceResult<T, E> = core::result::Result<T, E>;

type FrameResult<SpiErr, PinErr> = InterfaceResult<(), InterfaceError<SpiErr, PinErr>>;

/// Largest command frame, opcode included
///
/// Gamma tables are the longest commands in the power-on script (1 + 16 bytes).
pub const MAX_COMMAND_LEN: usize = 20;

/// Hold time for each phase of the hardware reset pulse in milliseconds
pub const RESET_PULSE_MS: u32 = 20;

/// Trait for hardware interface to ST7735 controller
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Display`](crate::display::Display) to work with any
/// SPI + GPIO implementation that satisfies embedded-hal traits.
///
/// Implementations own the bus for the duration of each call. At most one
/// command may be in flight; callers that share the bus must serialise whole
/// calls, never individual bytes.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Send one framed command
    ///
    /// The implementation must, in order:
    /// 1. Assert CS (low) and set DC low
    /// 2. Send the opcode byte
    /// 3. Set DC high
    /// 4. Send the argument bytes, if any
    /// 5. Deassert CS (high)
    ///
    /// # Errors
    ///
    /// Returns an error if the command does not fit a frame, or if SPI
    /// communication or GPIO fails.
    #[allow(clippy::type_complexity)]
    fn send_command(&mut self, command: u8, args: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Send an opcode followed by a burst of 16-bit pixels in one CS window
    ///
    /// Pixels are sent big-endian with DC high. CS is only deasserted after
    /// the last pixel has left the bus.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    #[allow(clippy::type_complexity)]
    fn write_memory<P>(&mut self, command: u8, pixels: P) -> InterfaceResult<(), Self::Error>
    where
        P: IntoIterator<Item = u16>;

    /// Park the control lines: CS high (deselected) and DC high
    ///
    /// # Errors
    ///
    /// Returns an error if GPIO fails.
    #[allow(clippy::type_complexity)]
    fn idle(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Perform hardware reset
    ///
    /// The implementation must:
    /// 1. Set RST pin low
    /// 2. Wait at least 20ms
    /// 3. Set RST pin high
    /// 4. Wait at least 20ms
    ///
    /// Implementations without a reset line do nothing and return `Ok`.
    ///
    /// # Errors
    ///
    /// Returns an error if GPIO fails.
    #[allow(clippy::type_complexity)]
    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
    /// Command plus arguments exceed [`MAX_COMMAND_LEN`]
    CommandTooLong {
        /// Requested frame length, opcode included
        len: usize,
    },
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
            Self::CommandTooLong { len } => write!(
                f,
                "Command too long: {len} bytes (max {MAX_COMMAND_LEN})"
            ),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Staging buffer for one outgoing command
///
/// Built on the stack for each call, so argument bytes are always sent from
/// RAM regardless of where the caller's slice lives, and no state is shared
/// between commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CommandFrame {
    buf: [u8; MAX_COMMAND_LEN],
    len: usize,
}

impl CommandFrame {
    /// Stage an opcode and its arguments
    ///
    /// Returns `None` if `1 + args.len()` exceeds [`MAX_COMMAND_LEN`].
    pub fn new(opcode: u8, args: &[u8]) -> Option<Self> {
        let len = args.len() + 1;
        if len > MAX_COMMAND_LEN {
            return None;
        }
        let mut buf = [0u8; MAX_COMMAND_LEN];
        buf[0] = opcode;
        buf[1..len].copy_from_slice(args);
        Some(Self { buf, len })
    }

    /// The opcode byte
    pub fn opcode(&self) -> u8 {
        self.buf[0]
    }

    /// The staged argument bytes
    pub fn args(&self) -> &[u8] {
        &self.buf[1..self.len]
    }
}

/// Hardware interface implementation for ST7735
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 SPI bus and GPIO traits.
///
/// ## Type Parameters
///
/// * `SPI` - SPI bus implementing [`SpiBus`] (no hardware chip select)
/// * `CS` - Chip select pin implementing [`OutputPin`]
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
#[derive(Debug)]
pub struct Interface<SPI, CS, DC, RST> {
    /// SPI bus for communication
    spi: SPI,
    /// Chip select pin (active low)
    cs: CS,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low), if wired
    rst: Option<RST>,
}

impl<SPI, CS, DC, RST> Interface<SPI, CS, DC, RST>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Create a new Interface
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI bus (must implement [`SpiBus`])
    /// * `cs` - Chip select pin (output, active low)
    /// * `dc` - Data/Command pin (output, low=command, high=data)
    /// * `rst` - Reset pin (output, active low), `None` if not wired
    pub fn new(spi: SPI, cs: CS, dc: DC, rst: Option<RST>) -> Self {
        Self { spi, cs, dc, rst }
    }

    /// Whether a reset line was supplied
    pub fn has_reset(&self) -> bool {
        self.rst.is_some()
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, CS, DC, Option<RST>) {
        (self.spi, self.cs, self.dc, self.rst)
    }
}

impl<SPI, CS, DC, RST, PinErr> Interface<SPI, CS, DC, RST>
where
    SPI: SpiBus,
    CS: OutputPin<Error = PinErr>,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
{
    /// Clock bytes out one at a time without waiting for the last one
    fn write_bytes(&mut self, bytes: &[u8]) -> FrameResult<SPI::Error, PinErr> {
        for byte in bytes {
            self.spi
                .write(core::slice::from_ref(byte))
                .map_err(InterfaceError::Spi)?;
        }
        Ok(())
    }

    /// Clock bytes out and return once the last one has left the bus
    fn transfer(&mut self, bytes: &[u8]) -> FrameResult<SPI::Error, PinErr> {
        self.write_bytes(bytes)?;
        self.spi.flush().map_err(InterfaceError::Spi)
    }

    /// Run `body` inside one chip-select window
    ///
    /// CS is released even if `body` fails, so a bus fault never leaves the
    /// controller selected.
    fn in_window<F>(&mut self, body: F) -> FrameResult<SPI::Error, PinErr>
    where
        F: FnOnce(&mut Self) -> FrameResult<SPI::Error, PinErr>,
    {
        self.cs.set_low().map_err(InterfaceError::Pin)?;
        let result = body(self);
        let released = self.cs.set_high().map_err(InterfaceError::Pin);
        result.and(released)
    }

    fn send_opcode(&mut self, opcode: u8) -> FrameResult<SPI::Error, PinErr> {
        self.dc.set_low().map_err(InterfaceError::Pin)?;
        self.transfer(&[opcode])?;
        self.dc.set_high().map_err(InterfaceError::Pin)
    }
}

impl<SPI, CS, DC, RST, PinErr> DisplayInterface for Interface<SPI, CS, DC, RST>
where
    SPI: SpiBus,
    SPI::Error: Debug,
    CS: OutputPin<Error = PinErr>,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8, args: &[u8]) -> InterfaceResult<(), Self::Error> {
        let frame = CommandFrame::new(command, args).ok_or(InterfaceError::CommandTooLong {
            len: args.len() + 1,
        })?;

        self.in_window(|this| {
            this.send_opcode(frame.opcode())?;
            if !frame.args().is_empty() {
                this.transfer(frame.args())?;
            }
            Ok(())
        })
    }

    fn write_memory<P>(&mut self, command: u8, pixels: P) -> InterfaceResult<(), Self::Error>
    where
        P: IntoIterator<Item = u16>,
    {
        self.in_window(|this| {
            this.send_opcode(command)?;
            for pixel in pixels {
                this.write_bytes(&pixel.to_be_bytes())?;
            }
            this.spi.flush().map_err(InterfaceError::Spi)
        })
    }

    fn idle(&mut self) -> InterfaceResult<(), Self::Error> {
        self.cs.set_high().map_err(InterfaceError::Pin)?;
        self.dc.set_high().map_err(InterfaceError::Pin)
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        let Some(rst) = self.rst.as_mut() else {
            log::debug!("no reset line wired; skipping hardware reset");
            return Ok(());
        };
        // Reset sequence: LOW -> wait 20ms -> HIGH -> wait 20ms
        rst.set_low().map_err(InterfaceError::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        rst.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        Ok(())
    }
}
