//! Opcode table for the board link
//!
//! Every frame begins with one opcode byte. `0x00` is reserved and never
//! assigned so a valid frame can never start with a null byte.

/// Poll the reed switches; answered with the occupancy grid
pub const OP_SENSOR: u8 = 0x01;
/// Deliver a batch of magnet move records
pub const OP_MAGNET: u8 = 0x02;
/// Set the LED array color
pub const OP_LED: u8 = 0x03;
/// Session setup frame, only valid during the handshake
pub const OP_HANDSHAKE: u8 = 0x10;
/// Single-byte acknowledgement
pub const OP_ACK: u8 = 0x20;
/// End the session
pub const OP_QUIT: u8 = 0xFF;

/// Operation kind derived from a frame's opcode byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OpKind {
    /// Read the sensor grid and reply with its state
    Sensor,
    /// Record magnet move data
    Magnet,
    /// Update the LED color
    Led,
    /// Nothing to do
    Noop,
    /// Terminate the session
    Quit,
}

/// Classify a single opcode byte.
///
/// Total over all byte values; anything outside the assigned set maps to
/// [`OpKind::Noop`]. That includes [`OP_HANDSHAKE`] and [`OP_ACK`], which
/// belong to the session setup phase and never reach ordinary dispatch.
pub fn classify(byte: u8) -> OpKind {
    match byte {
        OP_SENSOR => OpKind::Sensor,
        OP_MAGNET => OpKind::Magnet,
        OP_LED => OpKind::Led,
        OP_QUIT => OpKind::Quit,
        _ => OpKind::Noop,
    }
}
