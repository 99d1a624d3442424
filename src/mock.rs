//! Recording hardware double shared by the unit tests
//!
//! One [`Recorder`] stands in for every platform collaborator at once (GPIO ports,
//! SPI bus, delay, clocks) and appends each call to a shared event log. Tests then
//! decode that log into chip-select windows with [`Recorder::wire`].

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{ErrorKind, ErrorType, SpiBus};

use crate::bringup::Platform;
use crate::config::BaudDivisor;
use crate::pin::{GpioPorts, Pin, PinMode, Port, resolve_port};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Mode(Port, u16, PinMode),
    PushPull(Port, u16),
    Level(Port, u16, bool),
    Byte(u8),
    Flush,
    DelayMs(u32),
    DelayNs(u32),
    PortClock(Port),
    SpiClock,
    SpiInit(BaudDivisor),
}

/// One chip-select window as seen on the wire
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Bytes clocked out with data/command low
    pub command: Vec<u8>,
    /// Bytes clocked out with data/command high
    pub data: Vec<u8>,
    /// Whether the bus was flushed after the last byte and before chip select rose
    pub flushed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Wire {
    Frame(Frame),
    DelayMs(u32),
    /// Level change on a line other than chip select or data/command
    Level(Port, u16, bool),
    /// Byte sent while chip select was high
    Stray(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockError;

impl embedded_hal::spi::Error for MockError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Default)]
struct State {
    events: Vec<Event>,
    /// Bytes the bus accepts before every further write fails
    spi_budget: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct Recorder {
    state: Rc<RefCell<State>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_spi_after(&self, bytes: usize) {
        self.state.borrow_mut().spi_budget = Some(bytes);
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn clear(&self) {
        self.state.borrow_mut().events.clear();
    }

    fn push(&self, event: Event) {
        self.state.borrow_mut().events.push(event);
    }

    /// Decode the log into chip-select windows, delays and other line changes
    pub fn wire(&self, cs: Pin, dc: Pin) -> Vec<Wire> {
        let cs_port = resolve_port(cs).unwrap();
        let dc_port = resolve_port(dc).unwrap();
        let mut out = Vec::new();
        let mut window: Option<Frame> = None;
        let mut data_mode = true;

        for event in self.events() {
            match event {
                Event::Level(port, mask, high) if port == cs_port && mask == cs.mask() => {
                    match (high, window.take()) {
                        (false, None) => window = Some(Frame::default()),
                        (true, Some(frame)) => out.push(Wire::Frame(frame)),
                        (false, Some(frame)) => window = Some(frame),
                        (true, None) => out.push(Wire::Level(port, mask, high)),
                    }
                }
                Event::Level(port, mask, high) if port == dc_port && mask == dc.mask() => {
                    data_mode = high;
                }
                Event::Level(port, mask, high) => out.push(Wire::Level(port, mask, high)),
                Event::Byte(byte) => match window.as_mut() {
                    Some(frame) => {
                        frame.flushed = false;
                        if data_mode {
                            frame.data.push(byte);
                        } else {
                            frame.command.push(byte);
                        }
                    }
                    None => out.push(Wire::Stray(byte)),
                },
                Event::Flush => {
                    if let Some(frame) = window.as_mut() {
                        frame.flushed = true;
                    }
                }
                Event::DelayMs(ms) => out.push(Wire::DelayMs(ms)),
                _ => {}
            }
        }
        out
    }

    /// Only the chip-select windows, in order
    pub fn frames(&self, cs: Pin, dc: Pin) -> Vec<Frame> {
        self.wire(cs, dc)
            .into_iter()
            .filter_map(|item| match item {
                Wire::Frame(frame) => Some(frame),
                _ => None,
            })
            .collect()
    }
}

impl GpioPorts for Recorder {
    fn set_mode(&mut self, port: Port, mask: u16, mode: PinMode) {
        self.push(Event::Mode(port, mask, mode));
    }

    fn set_push_pull(&mut self, port: Port, mask: u16) {
        self.push(Event::PushPull(port, mask));
    }

    fn set(&mut self, port: Port, mask: u16) {
        self.push(Event::Level(port, mask, true));
    }

    fn clear(&mut self, port: Port, mask: u16) {
        self.push(Event::Level(port, mask, false));
    }
}

impl ErrorType for Recorder {
    type Error = MockError;
}

impl SpiBus<u8> for Recorder {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        for &byte in words {
            let mut state = self.state.borrow_mut();
            if let Some(budget) = state.spi_budget.as_mut() {
                if *budget == 0 {
                    return Err(MockError);
                }
                *budget -= 1;
            }
            state.events.push(Event::Byte(byte));
        }
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        read.fill(0);
        self.write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let copy: Vec<u8> = words.to_vec();
        words.fill(0);
        self.write(&copy)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.push(Event::Flush);
        Ok(())
    }
}

impl DelayNs for Recorder {
    fn delay_ns(&mut self, ns: u32) {
        self.push(Event::DelayNs(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.push(Event::DelayMs(ms));
    }
}

impl Platform for Recorder {
    fn enable_port_clock(&mut self, port: Port) {
        self.push(Event::PortClock(port));
    }

    fn enable_spi_clock(&mut self) {
        self.push(Event::SpiClock);
    }

    fn init_spi_master(&mut self, divisor: BaudDivisor) {
        self.push(Event::SpiInit(divisor));
    }
}
