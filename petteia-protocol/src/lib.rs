//! Serial link protocol for the Petteia board
//!
//! This crate defines the byte protocol spoken between the host controller
//! and the board peripheral: an Arduino-class microcontroller that lights an
//! addressable-LED array under the squares and reads reed switches plus a
//! gantry-mounted electromagnet. The same crate serves both ends of the
//! line, so opcode values and payload layouts can never drift apart.
//!
//! # Frame format
//!
//! Every instruction is one opcode byte followed by an operation-specific
//! payload:
//!
//! ```text
//! ┌────────┬─────────────┐
//! │ OPCODE │ PAYLOAD     │
//! │ 1B     │ 0+ B        │
//! └────────┴─────────────┘
//! ```
//!
//! There is no length prefix and no checksum; the transport is assumed
//! ordered and reliable, and one write carries one whole frame. Before any
//! instruction flows, the host opens the session with the two-round exchange
//! in [`handshake`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod opcode;
pub mod instruction;
pub mod link;
pub mod handshake;
pub mod sensor;

pub use opcode::{
    classify, OpKind, OP_ACK, OP_HANDSHAKE, OP_LED, OP_MAGNET, OP_QUIT, OP_SENSOR,
};
pub use instruction::{
    decode_color, decode_move_count, FrameError, Instruction, PayloadError, LED_PAYLOAD_LEN,
    MOVE_RECORD_LEN,
};
pub use link::{write_ack, SerialLink};
pub use handshake::{Handshake, HandshakePhase, HandshakeStatus, HANDSHAKE_FRAME_LEN};
pub use sensor::{SensorGrid, SENSOR_REPLY_LEN, SQUARE_COUNT};

/// Color value carried by a `Led` payload, re-exported from `rgb` so both
/// ends of the link name the same type
pub use rgb::RGB8;
