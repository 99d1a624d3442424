//! Controller command scripts
//!
//! A power-on script is an ordered list of [`Command`] records, each an opcode,
//! its argument bytes, and an optional delay to observe after the command has
//! been sent. [`Display::run_sequence`](crate::Display::run_sequence) plays a
//! script open-loop: nothing is read back from the controller.
//!
//! Vendor datasheets and many existing drivers publish the same scripts in a
//! compact byte-coded form:
//!
//! ```text
//! opcode, len | DELAY_FLAG?, arg0 .. arg(len-1), [delay_ms]
//! ...
//! 0x00                                           (end of table)
//! ```
//!
//! [`PackedSequence`] decodes that form into [`Command`]s so either representation
//! can be played.
//!
//! ## Example
//!
//! ```
//! use st7735_boot::command;
//! use st7735_boot::sequence::{Command, PackedSequence, DELAY_FLAG};
//!
//! let table = [command::SLPOUT, DELAY_FLAG, 120, command::COLMOD, 1, 0x05, 0x00];
//! let mut script = PackedSequence::new(&table);
//!
//! assert_eq!(script.next(), Some(Ok(Command::new(command::SLPOUT, &[]).with_delay(120))));
//! assert_eq!(script.next(), Some(Ok(Command::new(command::COLMOD, &[0x05]))));
//! assert_eq!(script.next(), None);
//! ```

use core::iter::FusedIterator;

use crate::command::{COLMOD, DISPON, GMCTRN1, GMCTRP1, INVOFF, NOP, NORON, SLPOUT, SWRESET};
use crate::interface::MAX_COMMAND_LEN;

/// Flag bit in the packed length byte: a delay byte follows the arguments
pub const DELAY_FLAG: u8 = 0x80;

/// One controller command with its arguments and post-command delay
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Command<'a> {
    /// Opcode byte; 0 is reserved as the end-of-sequence sentinel
    pub opcode: u8,
    /// Argument bytes sent with DC high
    pub args: &'a [u8],
    /// Milliseconds to wait after the command, if any
    pub delay_ms: Option<u8>,
}

impl<'a> Command<'a> {
    /// Command without a trailing delay
    pub const fn new(opcode: u8, args: &'a [u8]) -> Self {
        Self {
            opcode,
            args,
            delay_ms: None,
        }
    }

    /// Add a post-command delay
    pub const fn with_delay(mut self, delay_ms: u8) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    /// The end-of-sequence marker
    pub const fn sentinel() -> Self {
        Self::new(NOP, &[])
    }

    /// Whether this record terminates a sequence
    pub const fn is_sentinel(&self) -> bool {
        self.opcode == NOP
    }

    /// Frame length on the wire, opcode included
    pub const fn frame_len(&self) -> usize {
        self.args.len() + 1
    }

    fn check_len(&self, offset: usize) -> Result<(), SequenceError> {
        let len = self.frame_len();
        if len > MAX_COMMAND_LEN {
            return Err(SequenceError::TooLong { offset, len });
        }
        Ok(())
    }
}

/// Check that every record before the first sentinel fits one command frame
///
/// # Errors
///
/// Returns [`SequenceError::TooLong`] with the index of the first oversized record.
pub fn check_script(script: &[Command<'_>]) -> Result<(), SequenceError> {
    script
        .iter()
        .take_while(|command| !command.is_sentinel())
        .enumerate()
        .try_for_each(|(index, command)| command.check_len(index))
}

/// ST7735 power-on script
///
/// Software reset, sleep out, no inversion, 16-bit colour, gamma tables,
/// normal mode, display on.
pub const INIT_SEQUENCE: &[Command<'static>] = &[
    Command::new(SWRESET, &[]).with_delay(120),
    Command::new(SLPOUT, &[]).with_delay(120),
    Command::new(INVOFF, &[]),
    // 16-bit colour
    Command::new(COLMOD, &[0x05]),
    Command::new(
        GMCTRP1,
        &[
            0x02, 0x1c, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2d, 0x29, 0x25, 0x2B, 0x39, 0x00, 0x01,
            0x03, 0x10,
        ],
    ),
    Command::new(
        GMCTRN1,
        &[
            0x03, 0x1d, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D, 0x2E, 0x2E, 0x37, 0x3F, 0x00, 0x00,
            0x02, 0x10,
        ],
    ),
    Command::new(NORON, &[]).with_delay(10),
    Command::new(DISPON, &[]).with_delay(10),
];

/// [`INIT_SEQUENCE`] in packed byte-coded form
#[rustfmt::skip]
pub const INIT_SEQUENCE_PACKED: &[u8] = &[
    SWRESET, DELAY_FLAG, 120,
    SLPOUT,  DELAY_FLAG, 120,
    INVOFF,  0,
    COLMOD,  1, 0x05,
    GMCTRP1, 16,
        0x02, 0x1c, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2d,
        0x29, 0x25, 0x2B, 0x39, 0x00, 0x01, 0x03, 0x10,
    GMCTRN1, 16,
        0x03, 0x1d, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D,
        0x2E, 0x2E, 0x37, 0x3F, 0x00, 0x00, 0x02, 0x10,
    NORON,   DELAY_FLAG, 10,
    DISPON,  DELAY_FLAG, 10,
    NOP, 0,
];

/// Errors from decoding a packed command table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceError {
    /// The table ended inside the descriptor starting at `offset`
    Truncated {
        /// Byte offset of the incomplete descriptor
        offset: usize,
    },
    /// A command does not fit in [`MAX_COMMAND_LEN`] bytes
    TooLong {
        /// Byte offset of the descriptor, or record index in a structured script
        offset: usize,
        /// Frame length, opcode included
        len: usize,
    },
}

impl core::fmt::Display for SequenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Truncated { offset } => write!(
                f,
                "Command table truncated in descriptor at offset {offset}"
            ),
            Self::TooLong { offset, len } => write!(
                f,
                "Command at offset {offset} is {len} bytes (max {MAX_COMMAND_LEN})"
            ),
        }
    }
}

impl core::error::Error for SequenceError {}

/// Iterator decoding a packed command table
///
/// Stops at the first zero opcode, or cleanly at the end of the slice if the
/// table has no sentinel. A descriptor cut short by the end of the slice yields
/// one [`SequenceError::Truncated`] and then ends; a descriptor too long for one
/// command frame yields one [`SequenceError::TooLong`] and then ends.
#[derive(Clone, Debug)]
pub struct PackedSequence<'a> {
    table: &'a [u8],
    offset: usize,
    done: bool,
}

impl<'a> PackedSequence<'a> {
    /// Start decoding at the beginning of `table`
    pub fn new(table: &'a [u8]) -> Self {
        Self {
            table,
            offset: 0,
            done: false,
        }
    }

    fn decode(&self) -> Option<(Command<'a>, usize)> {
        let start = self.offset;
        let opcode = *self.table.get(start)?;
        let flags = *self.table.get(start + 1)?;
        let args_start = start + 2;
        let args_end = args_start + (flags & !DELAY_FLAG) as usize;
        let args = self.table.get(args_start..args_end)?;

        let command = Command::new(opcode, args);
        if flags & DELAY_FLAG == 0 {
            return Some((command, args_end));
        }
        let delay = *self.table.get(args_end)?;
        Some((command.with_delay(delay), args_end + 1))
    }
}

impl<'a> Iterator for PackedSequence<'a> {
    type Item = Result<Command<'a>, SequenceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.table.get(self.offset) {
            None | Some(&NOP) => {
                self.done = true;
                return None;
            }
            Some(_) => {}
        }
        let Some((command, next)) = self.decode() else {
            self.done = true;
            return Some(Err(SequenceError::Truncated {
                offset: self.offset,
            }));
        };
        if let Err(e) = command.check_len(self.offset) {
            self.done = true;
            return Some(Err(e));
        }
        self.offset = next;
        Some(Ok(command))
    }
}

impl FusedIterator for PackedSequence<'_> {}
