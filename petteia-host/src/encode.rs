//! Instruction frame builders
//!
//! Every builder returns a complete, ready-to-send frame: the opcode byte
//! followed by the payload layout the board decodes. Keeping the byte
//! assembly here means the rest of the host only ever handles whole frames.

use petteia_protocol::{MOVE_RECORD_LEN, OP_ACK, OP_LED, OP_MAGNET, OP_QUIT, OP_SENSOR, RGB8};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One magnet move record: a gantry target plus the electromagnet switch
///
/// Wire form is 9 bytes: `x` (f32 LE), `y` (f32 LE), switch byte (0 or 1).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveStep {
    /// Gantry target x coordinate
    pub x: f32,
    /// Gantry target y coordinate
    pub y: f32,
    /// Electromagnet engaged while moving to the target
    pub magnet_on: bool,
}

impl MoveStep {
    /// Append this record's wire form to a frame under construction
    pub fn encode_into(&self, frame: &mut Vec<u8>) {
        frame.extend_from_slice(&self.x.to_le_bytes());
        frame.extend_from_slice(&self.y.to_le_bytes());
        frame.push(self.magnet_on as u8);
    }
}

/// Build a `[LED, r, g, b]` frame setting the array color
pub fn led(color: RGB8) -> Vec<u8> {
    vec![OP_LED, color.r, color.g, color.b]
}

/// Build a `[MAGNET, records...]` frame carrying a batch of move records.
///
/// Returns `None` for an empty batch; the wire format requires at least one
/// record.
pub fn magnet(steps: &[MoveStep]) -> Option<Vec<u8>> {
    if steps.is_empty() {
        return None;
    }
    let mut frame = Vec::with_capacity(1 + steps.len() * MOVE_RECORD_LEN);
    frame.push(OP_MAGNET);
    for step in steps {
        step.encode_into(&mut frame);
    }
    Some(frame)
}

/// Build the single-byte sensor poll frame
pub fn sensor() -> Vec<u8> {
    vec![OP_SENSOR]
}

/// Build the single-byte session-ending frame
pub fn quit() -> Vec<u8> {
    vec![OP_QUIT]
}

/// Build the single-byte acknowledgement frame
pub fn ack() -> Vec<u8> {
    vec![OP_ACK]
}
