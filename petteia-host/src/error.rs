//! Session errors on the host side of the link

use std::io;

/// Convenience alias for session results
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors raised while establishing or driving a session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport failure
    #[error("transport error: {0}")]
    Io(#[from] io::Error),

    /// Peer id 0 collides with the reserved null byte
    #[error("peer id 0 is reserved")]
    ReservedPeerId,

    /// The board echoed something other than our initiation
    #[error("handshake echo mismatch: sent {sent:02x?}, got {got:02x?}")]
    EchoMismatch { sent: [u8; 2], got: [u8; 2] },

    /// The board answered the readback with something other than an ack
    #[error("expected ack byte 0x{expected:02x}, got 0x{got:02x}")]
    NotAcknowledged { expected: u8, got: u8 },

    /// Tried to send a frame without even an opcode byte
    #[error("refusing to send an empty frame")]
    EmptyFrame,
}
