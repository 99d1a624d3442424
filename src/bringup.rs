//! One-shot bring-up sequencer
//!
//! [`BringUp`] takes a board from reset to a panel showing the diagnostic
//! stripe pattern. The steps run in a fixed order with no branching back:
//!
//! ```text
//! ClockEnable -> PinConfigure -> BusInit -> ChipSelectIdle -> PreDelay
//!   -> RunInitSequence -> HardReset -> BacklightEnable -> DeriveConfig
//!   -> Configure -> SetAddressWindow -> FillPattern -> Done
//! ```
//!
//! Every logical pin is resolved before the first clock is enabled, so a bad
//! pin assignment fails with [`Error::Pin`] and leaves the hardware untouched.
//! Any later fault is returned as-is; boards without a supervisor can pass the
//! result to [`halt_on_error`](crate::halt_on_error).
//!
//! [`BringUp::run`] consumes the sequencer, so [`Stage::Done`] is reached at
//! most once per instance.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use embedded_hal::spi::SpiBus;

use crate::config::{BaudDivisor, Config};
use crate::display::Display;
use crate::error::Error;
use crate::interface::Interface;
use crate::pin::{Drive, GpioPorts, Line, Pin, PinBank, PinError, PinMode, Port, resolve_port};

/// Settle time between parking the control lines and the first command
pub const PRE_INIT_DELAY_MS: u32 = 10;

/// Clock and bus setup the platform must provide
///
/// Register-level operations are assumed to always succeed.
pub trait Platform {
    /// Gate the clock for a GPIO port on
    fn enable_port_clock(&mut self, port: Port);
    /// Gate the clock for the display SPI peripheral on
    fn enable_spi_clock(&mut self);
    /// Configure the SPI peripheral as master, mode 0, 8-bit, MSB first
    fn init_spi_master(&mut self, divisor: BaudDivisor);
}

/// Bring-up steps, in execution order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Enable GPIO port and SPI clocks
    ClockEnable,
    /// Program pin modes
    PinConfigure,
    /// Initialise the SPI master
    BusInit,
    /// Deselect the controller
    ChipSelectIdle,
    /// Wait [`PRE_INIT_DELAY_MS`]
    PreDelay,
    /// Play the power-on script
    RunInitSequence,
    /// Pulse reset, if wired
    HardReset,
    /// Turn the backlight on, if wired
    BacklightEnable,
    /// Report the decoded configuration
    DeriveConfig,
    /// Send MADCTL and frame timing
    Configure,
    /// Select the panel area
    SetAddressWindow,
    /// Stream the stripe pattern
    FillPattern,
    /// Bring-up complete
    Done,
}

impl Stage {
    /// The step after this one, `None` after [`Stage::Done`]
    pub const fn next(self) -> Option<Self> {
        Some(match self {
            Self::ClockEnable => Self::PinConfigure,
            Self::PinConfigure => Self::BusInit,
            Self::BusInit => Self::ChipSelectIdle,
            Self::ChipSelectIdle => Self::PreDelay,
            Self::PreDelay => Self::RunInitSequence,
            Self::RunInitSequence => Self::HardReset,
            Self::HardReset => Self::BacklightEnable,
            Self::BacklightEnable => Self::DeriveConfig,
            Self::DeriveConfig => Self::Configure,
            Self::Configure => Self::SetAddressWindow,
            Self::SetAddressWindow => Self::FillPattern,
            Self::FillPattern => Self::Done,
            Self::Done => return None,
        })
    }
}

/// Pin assignment for the display
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardPins {
    /// Chip select
    pub cs: Pin,
    /// SPI clock
    pub sck: Pin,
    /// SPI data out
    pub mosi: Pin,
    /// SPI data in, configured but never read
    pub miso: Pin,
    /// Data/command select
    pub dc: Pin,
    /// Reset line
    pub rst: Option<Pin>,
    /// Backlight enable
    pub backlight: Option<Pin>,
    /// Alternate function number routing the SPI peripheral to its pins
    pub spi_af: u8,
}

impl BoardPins {
    /// Reference board wiring
    pub const REFERENCE: Self = Self {
        cs: Pin::PB12,
        sck: Pin::PB13,
        mosi: Pin::PB15,
        miso: Pin::PB14,
        dc: Pin::PC5,
        rst: Some(Pin::PC4),
        backlight: Some(Pin::PA4),
        spi_af: 5,
    };

    /// Check that every assigned pin resolves to a port
    ///
    /// # Errors
    ///
    /// Returns the first [`PinError`] found.
    pub fn validate(&self) -> Result<(), PinError> {
        let required = [self.sck, self.miso, self.mosi, self.dc, self.cs];
        let optional = [self.backlight, self.rst];
        for pin in required.into_iter().chain(optional.into_iter().flatten()) {
            resolve_port(pin)?;
        }
        Ok(())
    }
}

/// Interface built from board lines
pub type BoardInterface<SPI, G> = Interface<SPI, Line<G>, Line<G>, Line<G>>;

/// Display returned by a completed bring-up
pub type BoardDisplay<SPI, G> = Display<BoardInterface<SPI, G>>;

/// Bring-up error
pub type BringUpError<SPI, G> = Error<BoardInterface<SPI, G>>;

/// One-shot display bring-up
pub struct BringUp<P, G, SPI> {
    platform: P,
    gpio: PinBank<G>,
    spi: SPI,
    pins: BoardPins,
    config: Config,
}

impl<P, G, SPI> BringUp<P, G, SPI>
where
    P: Platform,
    G: GpioPorts + Clone,
    SPI: SpiBus,
{
    /// Prepare a bring-up
    ///
    /// # Arguments
    ///
    /// * `platform` - Clock and SPI peripheral setup
    /// * `gpio` - GPIO port primitives
    /// * `spi` - SPI bus, initialised by the platform during bring-up
    /// * `pins` - Board wiring
    /// * `config` - Decoded board configuration
    pub fn new(platform: P, gpio: G, spi: SPI, pins: BoardPins, config: Config) -> Self {
        Self {
            platform,
            gpio: PinBank::new(gpio),
            spi,
            pins,
            config,
        }
    }

    /// Run every step and hand back the ready display
    ///
    /// # Errors
    ///
    /// Returns `Error::Pin` before touching any hardware if a pin does not
    /// resolve, or the first bus error otherwise.
    pub fn run<D: DelayNs>(
        mut self,
        delay: &mut D,
    ) -> Result<BoardDisplay<SPI, G>, BringUpError<SPI, G>> {
        self.pins.validate()?;
        let pins = self.pins;

        enter(Stage::ClockEnable);
        for port in [Port::A, Port::B, Port::C] {
            self.platform.enable_port_clock(port);
        }
        self.platform.enable_spi_clock();

        enter(Stage::PinConfigure);
        let af = PinMode::Alternate(pins.spi_af);
        self.gpio.configure_pin(pins.sck, af, Drive::PushPull)?;
        self.gpio.configure_pin(pins.miso, af, Drive::Input)?;
        self.gpio.configure_pin(pins.mosi, af, Drive::PushPull)?;
        let outputs = [pins.backlight, Some(pins.dc), pins.rst, Some(pins.cs)];
        for pin in outputs.into_iter().flatten() {
            self.gpio.configure_pin(pin, PinMode::Output, Drive::PushPull)?;
        }

        enter(Stage::BusInit);
        self.platform.init_spi_master(self.config.spi_divisor);

        let rst = pins.rst.map(|pin| self.gpio.output(pin)).transpose()?;
        let cs = self.gpio.output(pins.cs)?;
        let dc = self.gpio.output(pins.dc)?;
        let mut display = Display::new(Interface::new(self.spi, cs, dc, rst), self.config);

        enter(Stage::ChipSelectIdle);
        display.idle()?;

        enter(Stage::PreDelay);
        delay.delay_ms(PRE_INIT_DELAY_MS);

        enter(Stage::RunInitSequence);
        display.init(delay)?;

        enter(Stage::HardReset);
        display.hard_reset(delay)?;

        enter(Stage::BacklightEnable);
        match pins.backlight {
            Some(pin) => self.gpio.set_pin(pin, PinState::High)?,
            None => log::debug!("no backlight line wired; skipping"),
        }

        enter(Stage::DeriveConfig);
        let config = display.config();
        log::info!(
            "configure screen: FRMCTR1={:#08x} MADCTL={:#04x} SPI at {}MHz",
            config.frame_rate.word(),
            config.madctl,
            config.spi_mhz
        );

        enter(Stage::Configure);
        display.apply_config()?;

        enter(Stage::SetAddressWindow);
        display.set_panel_window()?;

        enter(Stage::FillPattern);
        display.fill_pattern()?;

        enter(Stage::Done);
        Ok(display)
    }
}

fn enter(stage: Stage) {
    log::debug!("bring-up: {stage:?}");
}
