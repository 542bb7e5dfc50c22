//! Instruction frames and payload decoding
//!
//! An instruction is the opcode byte plus an operation-specific payload:
//!
//! - `Led`: exactly 3 bytes, one per channel in (red, green, blue) order
//! - `Magnet`: a positive whole number of 9-byte move records
//! - `Sensor`, `Quit`: no payload
//!
//! [`Instruction`] borrows the receive buffer and splits it without copying;
//! payload content is only checked by the typed decoders.

use rgb::RGB8;

use crate::opcode::{classify, OpKind};

/// Length of a `Led` payload in bytes
pub const LED_PAYLOAD_LEN: usize = 3;

/// Length of one magnet move record in bytes
pub const MOVE_RECORD_LEN: usize = 9;

/// Errors wrapping a received frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// A frame carries at least the opcode byte
    Empty,
}

/// Errors decoding a typed value out of a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadError {
    /// The instruction is not of the kind this decoder handles
    WrongKind,
    /// The payload length does not fit the expected layout
    BadLength,
}

/// Read-only view over one received frame.
///
/// Borrows the caller's receive buffer for its whole lifetime; nothing is
/// copied and the buffer cannot be mutated through the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Instruction<'a> {
    kind: OpKind,
    payload: &'a [u8],
}

impl<'a> Instruction<'a> {
    /// Wrap a received frame, classifying its opcode byte.
    ///
    /// Fails on an empty buffer; there is no such thing as a zero-byte
    /// frame.
    pub fn new(frame: &'a [u8]) -> Result<Self, FrameError> {
        let (opcode, payload) = frame.split_first().ok_or(FrameError::Empty)?;
        Ok(Self {
            kind: classify(*opcode),
            payload,
        })
    }

    /// Operation kind classified from the opcode byte
    pub fn kind(&self) -> OpKind {
        self.kind
    }

    /// Payload bytes following the opcode
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Number of payload bytes, always the frame length minus one
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Decode the LED color out of a `Led` instruction.
    ///
    /// The payload must be exactly [`LED_PAYLOAD_LEN`] bytes, in (red,
    /// green, blue) channel order.
    pub fn color(&self) -> Result<RGB8, PayloadError> {
        if self.kind != OpKind::Led {
            return Err(PayloadError::WrongKind);
        }
        if self.payload.len() != LED_PAYLOAD_LEN {
            return Err(PayloadError::BadLength);
        }
        Ok(RGB8::new(self.payload[0], self.payload[1], self.payload[2]))
    }

    /// Count the move records in a `Magnet` instruction.
    ///
    /// The payload must be a positive whole number of
    /// [`MOVE_RECORD_LEN`]-byte records; a valid batch never counts zero.
    pub fn move_count(&self) -> Result<usize, PayloadError> {
        if self.kind != OpKind::Magnet {
            return Err(PayloadError::WrongKind);
        }
        if self.payload.is_empty() || self.payload.len() % MOVE_RECORD_LEN != 0 {
            return Err(PayloadError::BadLength);
        }
        Ok(self.payload.len() / MOVE_RECORD_LEN)
    }
}

/// Decode an LED color, folding every mismatch into `None`.
pub fn decode_color(instruction: &Instruction<'_>) -> Option<RGB8> {
    instruction.color().ok()
}

/// Count move records, folding every mismatch into 0.
///
/// Callers that need to tell a malformed batch apart from an absent one use
/// [`Instruction::move_count`] instead.
pub fn decode_move_count(instruction: &Instruction<'_>) -> usize {
    instruction.move_count().unwrap_or(0)
}
