//! Transport abstraction for the serial link
//!
//! The peripheral talks to the host over an ordered, reliable byte stream,
//! in practice a UART. The handshake commits to a read only after checking
//! how many bytes are waiting, so the trait models availability-gated serial
//! I/O instead of plain streaming reads.

use crate::opcode::OP_ACK;

/// Byte-stream transport with receive-availability reporting
///
/// Implemented over the board's serial peripheral on the device and over
/// in-memory pipes in tests.
pub trait SerialLink {
    /// Error type for transport operations
    type Error;

    /// Number of received bytes waiting to be read
    fn bytes_available(&mut self) -> Result<usize, Self::Error>;

    /// Read bytes from the link
    ///
    /// Blocks until the buffer is filled or an error occurs.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write bytes to the link
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// Write the single-byte acknowledgement frame.
///
/// Sent at the end of a successful handshake and after every processed
/// instruction that is not answered by data of its own.
pub fn write_ack<L: SerialLink>(link: &mut L) -> Result<(), L::Error> {
    link.write_blocking(&[OP_ACK])
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    #[derive(Default)]
    struct RecordingLink {
        written: Vec<u8>,
    }

    impl SerialLink for RecordingLink {
        type Error = Infallible;

        fn bytes_available(&mut self) -> Result<usize, Infallible> {
            Ok(0)
        }

        fn read_blocking(&mut self, _buf: &mut [u8]) -> Result<(), Infallible> {
            Ok(())
        }

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), Infallible> {
            self.written.extend_from_slice(data);
            Ok(())
        }
    }

    #[test]
    fn test_write_ack_is_a_single_byte() {
        let mut link = RecordingLink::default();
        write_ack(&mut link).unwrap();
        assert_eq!(link.written, [OP_ACK]);
    }
}
