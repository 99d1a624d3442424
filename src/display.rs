//! Core display operations

use embedded_hal::delay::DelayNs;

use crate::command::{CASET, FRMCTR1, MADCTL, RAMWR, RASET};
use crate::config::{Config, Dimensions, FrameRate};
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::pattern::Stripes;
use crate::sequence::{Command, INIT_SEQUENCE, PackedSequence, check_script};

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Core display driver for ST7735
///
/// Owns the hardware interface and the decoded board configuration. Every
/// operation is open-loop: commands are sent and nothing is read back.
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    pub fn new(interface: I, config: Config) -> Self {
        Self { interface, config }
    }

    /// Send one framed command with its arguments
    pub fn send_command(&mut self, opcode: u8, args: &[u8]) -> DisplayResult<I> {
        self.interface
            .send_command(opcode, args)
            .map_err(Error::Interface)
    }

    /// Play a command script
    ///
    /// Commands are sent in order, each followed by its delay if it carries
    /// one. Playback stops at the first sentinel record. Every record is
    /// checked against the frame size first, so an oversized record produces
    /// no bus traffic at all.
    ///
    /// # Errors
    ///
    /// Returns `Error::Sequence` if a record does not fit one command frame.
    pub fn run_sequence<D: DelayNs>(
        &mut self,
        sequence: &[Command<'_>],
        delay: &mut D,
    ) -> DisplayResult<I> {
        check_script(sequence)?;

        for command in sequence.iter().take_while(|command| !command.is_sentinel()) {
            self.run_command(command, delay)?;
        }
        Ok(())
    }

    /// Play a packed byte-coded command table
    ///
    /// The whole table is decoded before the first byte is sent, so a
    /// malformed table produces no bus traffic at all.
    ///
    /// # Errors
    ///
    /// Returns `Error::Sequence` if the table ends inside a descriptor or a
    /// descriptor does not fit one command frame.
    pub fn run_packed_sequence<D: DelayNs>(
        &mut self,
        table: &[u8],
        delay: &mut D,
    ) -> DisplayResult<I> {
        PackedSequence::new(table).try_for_each(|command| command.map(drop))?;

        for command in PackedSequence::new(table).flatten() {
            self.run_command(&command, delay)?;
        }
        Ok(())
    }

    fn run_command<D: DelayNs>(
        &mut self,
        command: &Command<'_>,
        delay: &mut D,
    ) -> DisplayResult<I> {
        log::trace!("cmd {:#04x} ({} args)", command.opcode, command.args.len());
        self.send_command(command.opcode, command.args)?;
        if let Some(ms) = command.delay_ms {
            delay.delay_ms(u32::from(ms));
        }
        Ok(())
    }

    /// Run the power-on script
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.run_sequence(INIT_SEQUENCE, delay)
    }

    /// Pulse the reset line, if the interface has one
    pub fn hard_reset<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.interface.reset(delay).map_err(Error::Interface)
    }

    /// Deselect the controller and park data/command high
    pub fn idle(&mut self) -> DisplayResult<I> {
        self.interface.idle().map_err(Error::Interface)
    }

    /// Set scan direction and frame timing
    ///
    /// Sends MADCTL with one byte, then FRMCTR1 with two or three bytes
    /// depending on [`FrameRate::args`].
    pub fn configure(&mut self, madctl: u8, frame_rate: FrameRate) -> DisplayResult<I> {
        self.send_command(MADCTL, &[madctl])?;
        self.send_command(FRMCTR1, frame_rate.args())
    }

    /// Apply the MADCTL and frame timing from the stored configuration
    pub fn apply_config(&mut self) -> DisplayResult<I> {
        self.configure(self.config.madctl, self.config.frame_rate)
    }

    /// Select the memory region for the next write
    ///
    /// Sends RASET with `x..=x+w-1` before CASET with `y..=y+h-1`. The
    /// controller uses the axis set last as the active one, so the order
    /// must not change.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidAddressWindow` if:
    /// - w == 0 or h == 0 (would cause underflow)
    /// - the inclusive end coordinate does not fit in 16 bits
    #[allow(clippy::many_single_char_names)]
    pub fn set_address_window(&mut self, x: u16, y: u16, w: u16, h: u16) -> DisplayResult<I> {
        let invalid = Error::InvalidAddressWindow { x, y, w, h };
        if w == 0 || h == 0 {
            return Err(invalid);
        }
        let (Some(x_end), Some(y_end)) = (x.checked_add(w - 1), y.checked_add(h - 1)) else {
            return Err(invalid);
        };

        self.send_command(RASET, &range_args(x, x_end))?;
        self.send_command(CASET, &range_args(y, y_end))
    }

    /// Select the configured panel area, shifted by the configured offsets
    pub fn set_panel_window(&mut self) -> DisplayResult<I> {
        let Config {
            dimensions,
            offset_x,
            offset_y,
            ..
        } = self.config;
        self.set_address_window(offset_x, offset_y, dimensions.width, dimensions.height)
    }

    /// Fill the configured area with the vertical stripe pattern
    ///
    /// Sends `width * height * 2` data bytes inside a single chip-select window.
    pub fn fill_pattern(&mut self) -> DisplayResult<I> {
        self.fill_with(Stripes::new(self.config.dimensions))
    }

    /// Stream raw 16-bit pixels into the current address window
    pub fn fill_with<P>(&mut self, pixels: P) -> DisplayResult<I>
    where
        P: IntoIterator<Item = u16>,
    {
        self.interface
            .write_memory(RAMWR, pixels)
            .map_err(Error::Interface)
    }

    /// Get display dimensions
    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Release the interface
    pub fn release(self) -> I {
        self.interface
    }
}

/// Start and inclusive end as big-endian words
fn range_args(start: u16, end: u16) -> [u8; 4] {
    let [s_hi, s_lo] = start.to_be_bytes();
    let [e_hi, e_lo] = end.to_be_bytes();
    [s_hi, s_lo, e_hi, e_lo]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{COLMOD, DISPON, GMCTRP1, INVOFF, SLPOUT, SWRESET};
    use crate::config::Builder;
    use crate::interface::{Interface, MAX_COMMAND_LEN};
    use crate::mock::Recorder;
    use crate::pin::{Line, Pin, PinBank};
    use crate::sequence::{DELAY_FLAG, INIT_SEQUENCE_PACKED, SequenceError};
    use alloc::vec::Vec;

    #[derive(Debug, Default)]
    struct MockInterface {
        command_data: Vec<(u8, Vec<u8>)>,
        pixels: Vec<u16>,
        resets: usize,
    }

    impl DisplayInterface for MockInterface {
        type Error = core::convert::Infallible;

        fn send_command(&mut self, command: u8, args: &[u8]) -> Result<(), Self::Error> {
            self.command_data.push((command, args.to_vec()));
            Ok(())
        }

        fn write_memory<P>(&mut self, command: u8, pixels: P) -> Result<(), Self::Error>
        where
            P: IntoIterator<Item = u16>,
        {
            self.command_data.push((command, Vec::new()));
            self.pixels.extend(pixels);
            Ok(())
        }

        fn idle(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        fn reset<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
            self.resets += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockDelay {
        ms: Vec<u32>,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.ms.push(ms);
        }
    }

    fn test_display() -> Display<MockInterface> {
        let config = Builder::new()
            .dimensions(Dimensions::new(160, 128).unwrap())
            .build()
            .unwrap();
        Display::new(MockInterface::default(), config)
    }

    const CS: Pin = Pin::PB12;
    const DC: Pin = Pin::PC5;

    type RecorderInterface = Interface<Recorder, Line<Recorder>, Line<Recorder>, Line<Recorder>>;

    fn recorder_display(recorder: &Recorder, dims: Dimensions) -> Display<RecorderInterface> {
        let bank = PinBank::new(recorder.clone());
        let interface = Interface::new(
            recorder.clone(),
            bank.output(CS).unwrap(),
            bank.output(DC).unwrap(),
            None,
        );
        let config = Builder::new().dimensions(dims).build().unwrap();
        Display::new(interface, config)
    }

    fn opcodes(display: &Display<MockInterface>) -> Vec<u8> {
        display
            .interface
            .command_data
            .iter()
            .map(|(cmd, _)| *cmd)
            .collect()
    }

    #[test]
    fn test_init_sends_every_command_in_order() {
        let mut display = test_display();
        let mut delay = MockDelay::default();
        display.init(&mut delay).unwrap();

        let expected: Vec<u8> = INIT_SEQUENCE.iter().map(|c| c.opcode).collect();
        assert_eq!(opcodes(&display), expected);
        assert_eq!(
            display.interface.command_data[3],
            (COLMOD, alloc::vec![0x05])
        );
        assert_eq!(display.interface.command_data[4].1.len(), 16);
        assert_eq!(delay.ms, [120, 120, 10, 10]);
    }

    #[test]
    fn test_run_sequence_stops_at_sentinel() {
        let mut display = test_display();
        let mut delay = MockDelay::default();
        let script = [
            Command::new(SLPOUT, &[]).with_delay(5),
            Command::new(INVOFF, &[]),
            Command::sentinel(),
            Command::new(DISPON, &[]),
        ];
        display.run_sequence(&script, &mut delay).unwrap();

        assert_eq!(opcodes(&display), [SLPOUT, INVOFF]);
        assert_eq!(delay.ms, [5]);
    }

    #[test]
    fn test_run_sequence_without_delays_never_waits() {
        let mut display = test_display();
        let mut delay = MockDelay::default();
        let script = [Command::new(INVOFF, &[]), Command::new(COLMOD, &[0x05])];
        display.run_sequence(&script, &mut delay).unwrap();
        assert!(delay.ms.is_empty());
    }

    #[test]
    fn test_packed_and_structured_scripts_match() {
        let mut structured = test_display();
        let mut packed = test_display();
        let mut structured_delay = MockDelay::default();
        let mut packed_delay = MockDelay::default();

        structured.init(&mut structured_delay).unwrap();
        packed
            .run_packed_sequence(INIT_SEQUENCE_PACKED, &mut packed_delay)
            .unwrap();

        assert_eq!(
            structured.interface.command_data,
            packed.interface.command_data
        );
        assert_eq!(structured_delay.ms, packed_delay.ms);
    }

    #[test]
    fn test_truncated_packed_table_sends_nothing() {
        let mut display = test_display();
        let mut delay = MockDelay::default();
        let table = [SWRESET, DELAY_FLAG, 120, GMCTRP1, 16, 0x02];

        let result = display.run_packed_sequence(&table, &mut delay);
        assert!(matches!(result, Err(Error::Sequence(_))));
        assert!(display.interface.command_data.is_empty());
        assert!(delay.ms.is_empty());
    }

    #[test]
    fn test_oversized_packed_descriptor_sends_nothing() {
        let mut display = test_display();
        let mut delay = MockDelay::default();
        let mut table = alloc::vec![SWRESET, DELAY_FLAG, 120, GMCTRP1, 25];
        table.extend([0x11; 25]);
        table.push(0);

        let result = display.run_packed_sequence(&table, &mut delay);
        assert!(matches!(
            result,
            Err(Error::Sequence(SequenceError::TooLong { offset: 3, len: 26 }))
        ));
        assert!(display.interface.command_data.is_empty());
        assert!(delay.ms.is_empty());
    }

    #[test]
    fn test_oversized_record_sends_nothing() {
        let mut display = test_display();
        let mut delay = MockDelay::default();
        let long = [0u8; MAX_COMMAND_LEN];
        let script = [
            Command::new(SWRESET, &[]).with_delay(120),
            Command::new(GMCTRP1, &long),
        ];

        let result = display.run_sequence(&script, &mut delay);
        assert!(matches!(
            result,
            Err(Error::Sequence(SequenceError::TooLong { offset: 1, .. }))
        ));
        assert!(display.interface.command_data.is_empty());
        assert!(delay.ms.is_empty());
    }

    #[test]
    fn test_oversized_packed_descriptor_leaves_bus_idle() {
        let recorder = Recorder::new();
        let mut display = recorder_display(&recorder, Dimensions::new(160, 128).unwrap());
        let mut table = alloc::vec![SWRESET, DELAY_FLAG, 120, GMCTRP1, 25];
        table.extend([0x11; 25]);
        table.push(0);

        let result = display.run_packed_sequence(&table, &mut recorder.clone());
        assert!(result.is_err());
        assert!(recorder.frames(CS, DC).is_empty());
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_configure_full_frame_rate() {
        let mut display = test_display();
        display
            .configure(0x80, FrameRate::from_word(0x00_06_03))
            .unwrap();
        assert_eq!(
            display.interface.command_data,
            [
                (MADCTL, alloc::vec![0x80]),
                (FRMCTR1, alloc::vec![0x00, 0x06, 0x03]),
            ]
        );
    }

    #[test]
    fn test_configure_short_frame_rate() {
        let mut display = test_display();
        display
            .configure(0x60, FrameRate::from_word(0x00_00_FF))
            .unwrap();
        assert_eq!(
            display.interface.command_data[1],
            (FRMCTR1, alloc::vec![0x00, 0x00])
        );
    }

    #[test]
    fn test_address_window_row_before_column() {
        let mut display = test_display();
        display.set_address_window(10, 20, 160, 128).unwrap();
        assert_eq!(
            display.interface.command_data,
            [
                (RASET, alloc::vec![0, 10, 0, 169]),
                (CASET, alloc::vec![0, 20, 0, 147]),
            ]
        );
    }

    #[test]
    fn test_address_window_wide_coordinates() {
        let mut display = test_display();
        display.set_address_window(300, 0, 1, 1).unwrap();
        assert_eq!(
            display.interface.command_data[0],
            (RASET, alloc::vec![0x01, 0x2C, 0x01, 0x2C])
        );
    }

    #[test]
    fn test_address_window_zero_width_returns_error() {
        let mut display = test_display();
        let result = display.set_address_window(0, 0, 0, 100);
        assert!(matches!(
            result,
            Err(Error::InvalidAddressWindow { w: 0, .. })
        ));
        assert!(display.interface.command_data.is_empty());
    }

    #[test]
    fn test_address_window_zero_height_returns_error() {
        let mut display = test_display();
        let result = display.set_address_window(0, 0, 100, 0);
        assert!(matches!(
            result,
            Err(Error::InvalidAddressWindow { h: 0, .. })
        ));
    }

    #[test]
    fn test_address_window_overflow_returns_error() {
        let mut display = test_display();
        let result = display.set_address_window(u16::MAX, 0, 2, 1);
        assert!(matches!(result, Err(Error::InvalidAddressWindow { .. })));
        assert!(display.interface.command_data.is_empty());
    }

    #[test]
    fn test_panel_window_uses_offsets() {
        let config = Builder::new()
            .dimensions(Dimensions::new(160, 80).unwrap())
            .offset(1, 26)
            .build()
            .unwrap();
        let mut display = Display::new(MockInterface::default(), config);
        display.set_panel_window().unwrap();
        assert_eq!(
            display.interface.command_data,
            [
                (RASET, alloc::vec![0, 1, 0, 160]),
                (CASET, alloc::vec![0, 26, 0, 105]),
            ]
        );
    }

    #[test]
    fn test_hard_reset_delegates_to_interface() {
        let mut display = test_display();
        display.hard_reset(&mut MockDelay::default()).unwrap();
        assert_eq!(display.interface.resets, 1);
    }

    #[test]
    fn test_fill_pattern_pixels() {
        let mut display = test_display();
        display.fill_pattern().unwrap();

        assert_eq!(opcodes(&display), [RAMWR]);
        let pixels = &display.interface.pixels;
        assert_eq!(pixels.len(), 160 * 128);
        assert_eq!(pixels[0], 0);
        assert_eq!(pixels[128], 2);
        assert_eq!(pixels[159 * 128 + 127], 318);
    }

    #[test]
    fn test_fill_pattern_single_chip_select_window() {
        let recorder = Recorder::new();
        let mut display = recorder_display(&recorder, Dimensions::new(6, 4).unwrap());
        display.fill_pattern().unwrap();

        assert_eq!(recorder.wire(CS, DC).len(), 1);
        let frames = recorder.frames(CS, DC);
        let frame = &frames[0];
        assert_eq!(frame.command, [RAMWR]);
        assert_eq!(frame.data.len(), 6 * 4 * 2);
        for (index, pixel) in frame.data.chunks(2).enumerate() {
            let column = (index / 4) as u16;
            assert_eq!(u16::from_be_bytes([pixel[0], pixel[1]]), 2 * column);
        }
    }
}
