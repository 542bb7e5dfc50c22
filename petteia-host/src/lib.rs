//! Host controller library for the Petteia board link
//!
//! Establishes the serial session with the board peripheral and sends it
//! typed instructions: LED colors, magnet move batches, sensor polls. The
//! peer speaks the protocol defined in `petteia-protocol`; this crate adds
//! what only the host needs:
//!
//! - [`encode`] builds ready-to-send instruction frames
//! - [`request`] parses the operator text grammar into frames
//! - [`session`] runs the handshake and the write/reply cycle
//!
//! The transport is anything `Read + Write`. Opening the physical serial
//! port, device discovery, and baud-rate choice stay in the binary.

#![deny(unsafe_code)]

pub mod encode;
pub mod error;
pub mod request;
pub mod session;

pub use encode::MoveStep;
pub use error::{Result, SessionError};
pub use request::{Request, RequestError};
pub use session::{Reply, Session};
