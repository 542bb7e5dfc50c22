//! Host side of the link: session setup and instruction exchange
//!
//! The host initiates the handshake, then alternates strictly between
//! writing one instruction frame and reading the reply its opcode calls
//! for. The transport is anything `Read + Write`; opening the physical
//! serial port (and picking its baud rate) is the binary's concern.

use std::io::{Read, Write};

use tracing::{debug, trace};

use petteia_protocol::{
    SensorGrid, HANDSHAKE_FRAME_LEN, OP_ACK, OP_HANDSHAKE, OP_SENSOR, SENSOR_REPLY_LEN,
};

use crate::error::{Result, SessionError};

/// Reply read back after sending an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Single-byte acknowledgement
    Ack,
    /// Sensor occupancy grid
    Sensor(SensorGrid),
}

/// An established link session
///
/// Owns the transport once the handshake has gone through, so instruction
/// traffic cannot start on an unestablished line.
#[derive(Debug)]
pub struct Session<T> {
    transport: T,
    peer_id: u8,
}

impl<T: Read + Write> Session<T> {
    /// Run the host half of the handshake and wrap the transport.
    ///
    /// Writes `[HANDSHAKE, peer_id]`, checks the board echoes it verbatim,
    /// repeats the frame as the readback, and expects a single ack byte.
    /// `peer_id` 0 is reserved and rejected up front.
    pub fn establish(mut transport: T, peer_id: u8) -> Result<Self> {
        if peer_id == 0 {
            return Err(SessionError::ReservedPeerId);
        }

        let initiation = [OP_HANDSHAKE, peer_id];
        debug!(peer_id, "initiating handshake");
        transport.write_all(&initiation)?;
        transport.flush()?;

        let mut echo = [0u8; HANDSHAKE_FRAME_LEN];
        transport.read_exact(&mut echo)?;
        if echo != initiation {
            return Err(SessionError::EchoMismatch {
                sent: initiation,
                got: echo,
            });
        }

        trace!("echo verified, sending readback");
        transport.write_all(&initiation)?;
        transport.flush()?;

        let mut ack = [0u8; 1];
        transport.read_exact(&mut ack)?;
        if ack[0] != OP_ACK {
            return Err(SessionError::NotAcknowledged {
                expected: OP_ACK,
                got: ack[0],
            });
        }

        debug!(peer_id, "session established");
        Ok(Self { transport, peer_id })
    }

    /// Peer id this session was established with
    pub fn peer_id(&self) -> u8 {
        self.peer_id
    }

    /// Send one instruction frame and read its reply.
    ///
    /// A sensor poll is answered with the fixed-size occupancy grid; every
    /// other instruction is answered with a single ack byte.
    pub fn send(&mut self, frame: &[u8]) -> Result<Reply> {
        let opcode = *frame.first().ok_or(SessionError::EmptyFrame)?;

        trace!(opcode, len = frame.len(), "sending instruction");
        self.transport.write_all(frame)?;
        self.transport.flush()?;

        if opcode == OP_SENSOR {
            let mut reply = [0u8; SENSOR_REPLY_LEN];
            self.transport.read_exact(&mut reply)?;
            let grid = SensorGrid::from_reply(reply);
            debug!(occupied = grid.occupied_count(), "sensor grid received");
            return Ok(Reply::Sensor(grid));
        }

        let mut ack = [0u8; 1];
        self.transport.read_exact(&mut ack)?;
        if ack[0] != OP_ACK {
            return Err(SessionError::NotAcknowledged {
                expected: OP_ACK,
                got: ack[0],
            });
        }
        Ok(Reply::Ack)
    }

    /// Send the session-ending frame and hand the transport back.
    ///
    /// The board acknowledges the frame and then stops serving this
    /// session.
    pub fn quit(mut self) -> Result<T> {
        self.send(&crate::encode::quit())?;
        debug!(peer_id = self.peer_id, "session closed");
        Ok(self.transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode;
    use petteia_protocol::{OP_LED, OP_QUIT, RGB8};
    use std::io::{self, Cursor};

    /// One-sided transport: reads come from a pre-recorded script, writes
    /// are captured for inspection.
    #[derive(Debug)]
    struct ScriptedPort {
        reads: Cursor<Vec<u8>>,
        written: Vec<u8>,
    }

    impl ScriptedPort {
        fn new(script: &[u8]) -> Self {
            Self {
                reads: Cursor::new(script.to_vec()),
                written: Vec::new(),
            }
        }
    }

    impl Read for ScriptedPort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads.read(buf)
        }
    }

    impl Write for ScriptedPort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_establish_writes_both_rounds() {
        // Board echoes the initiation, then acks the readback
        let port = ScriptedPort::new(&[OP_HANDSHAKE, 0x07, OP_ACK]);
        let session = Session::establish(port, 0x07).unwrap();

        assert_eq!(session.peer_id(), 0x07);
        assert_eq!(
            session.transport.written,
            [OP_HANDSHAKE, 0x07, OP_HANDSHAKE, 0x07]
        );
    }

    #[test]
    fn test_establish_rejects_reserved_peer_id() {
        let port = ScriptedPort::new(&[]);
        match Session::establish(port, 0) {
            Err(SessionError::ReservedPeerId) => {}
            other => panic!("expected reserved peer id error, got {other:?}"),
        }
    }

    #[test]
    fn test_establish_rejects_bad_echo() {
        let port = ScriptedPort::new(&[OP_HANDSHAKE, 0x09, OP_ACK]);
        match Session::establish(port, 0x07) {
            Err(SessionError::EchoMismatch { sent, got }) => {
                assert_eq!(sent, [OP_HANDSHAKE, 0x07]);
                assert_eq!(got, [OP_HANDSHAKE, 0x09]);
            }
            other => panic!("expected echo mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_establish_requires_the_ack() {
        let port = ScriptedPort::new(&[OP_HANDSHAKE, 0x07, 0x55]);
        match Session::establish(port, 0x07) {
            Err(SessionError::NotAcknowledged { expected, got }) => {
                assert_eq!(expected, OP_ACK);
                assert_eq!(got, 0x55);
            }
            other => panic!("expected missing ack error, got {other:?}"),
        }
    }

    fn established(extra_script: &[u8]) -> Session<ScriptedPort> {
        let mut script = vec![OP_HANDSHAKE, 0x07, OP_ACK];
        script.extend_from_slice(extra_script);
        Session::establish(ScriptedPort::new(&script), 0x07).unwrap()
    }

    #[test]
    fn test_send_led_waits_for_ack() {
        let mut session = established(&[OP_ACK]);
        let reply = session.send(&encode::led(RGB8::new(1, 2, 3))).unwrap();

        assert_eq!(reply, Reply::Ack);
        assert_eq!(
            session.transport.written[HANDSHAKE_FRAME_LEN * 2..],
            [OP_LED, 1, 2, 3]
        );
    }

    #[test]
    fn test_send_sensor_reads_the_grid() {
        let mut reply_bytes = [0u8; SENSOR_REPLY_LEN];
        reply_bytes[0] = 0b0000_0101;
        let mut session = established(&reply_bytes);

        match session.send(&encode::sensor()).unwrap() {
            Reply::Sensor(grid) => {
                assert!(grid.is_occupied(0));
                assert!(grid.is_occupied(2));
                assert_eq!(grid.occupied_count(), 2);
            }
            other => panic!("expected sensor grid, got {other:?}"),
        }
    }

    #[test]
    fn test_send_surfaces_missing_ack() {
        let mut session = established(&[0x00]);
        match session.send(&encode::led(RGB8::new(1, 2, 3))) {
            Err(SessionError::NotAcknowledged { got: 0x00, .. }) => {}
            other => panic!("expected missing ack error, got {other:?}"),
        }
    }

    #[test]
    fn test_send_rejects_empty_frame() {
        let mut session = established(&[]);
        match session.send(&[]) {
            Err(SessionError::EmptyFrame) => {}
            other => panic!("expected empty frame error, got {other:?}"),
        }
    }

    #[test]
    fn test_quit_acknowledged_and_returns_transport() {
        let session = established(&[OP_ACK]);
        let port = session.quit().unwrap();
        assert_eq!(port.written.last(), Some(&OP_QUIT));
    }
}
