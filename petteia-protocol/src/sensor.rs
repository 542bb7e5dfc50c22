//! Reed-switch occupancy grid
//!
//! A `Sensor` instruction is answered with the whole board state in one
//! fixed-size reply: a little-endian `u64` with one bit per square, bit `i`
//! set when square `i` holds a piece.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Length of a sensor reply in bytes
pub const SENSOR_REPLY_LEN: usize = 8;

/// Number of squares on the board
pub const SQUARE_COUNT: usize = 64;

/// Board occupancy as reported by the reed switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorGrid(u64);

impl SensorGrid {
    /// Wrap a raw occupancy bitboard
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// Decode the grid out of a sensor reply
    pub fn from_reply(reply: [u8; SENSOR_REPLY_LEN]) -> Self {
        Self(u64::from_le_bytes(reply))
    }

    /// Encode the grid as the wire reply
    pub fn to_reply(self) -> [u8; SENSOR_REPLY_LEN] {
        self.0.to_le_bytes()
    }

    /// Raw occupancy bitboard
    pub fn bits(self) -> u64 {
        self.0
    }

    /// Whether the given square holds a piece; out-of-range squares do not
    pub fn is_occupied(self, square: usize) -> bool {
        square < SQUARE_COUNT && self.0 & (1u64 << square) != 0
    }

    /// Set one square's occupancy
    pub fn set_occupied(&mut self, square: usize, occupied: bool) {
        if square >= SQUARE_COUNT {
            return;
        }
        let mask = 1u64 << square;
        if occupied {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }

    /// Number of occupied squares
    pub fn occupied_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Squares occupied now but not in `earlier` (pieces put down)
    pub fn placed_since(self, earlier: SensorGrid) -> SensorGrid {
        Self(self.0 & !earlier.0)
    }

    /// Squares occupied in `earlier` but not now (pieces picked up)
    pub fn lifted_since(self, earlier: SensorGrid) -> SensorGrid {
        Self(earlier.0 & !self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_is_little_endian() {
        let mut reply = [0u8; SENSOR_REPLY_LEN];
        reply[0] = 0x01;
        reply[7] = 0x80;

        let grid = SensorGrid::from_reply(reply);
        assert!(grid.is_occupied(0));
        assert!(grid.is_occupied(63));
        assert_eq!(grid.occupied_count(), 2);
        assert_eq!(grid.to_reply(), reply);
    }

    #[test]
    fn test_out_of_range_square_is_unoccupied() {
        let grid = SensorGrid::new(u64::MAX);
        assert!(grid.is_occupied(63));
        assert!(!grid.is_occupied(64));
        assert!(!grid.is_occupied(usize::MAX));
    }

    #[test]
    fn test_set_occupied_round_trips() {
        let mut grid = SensorGrid::default();
        grid.set_occupied(12, true);
        grid.set_occupied(44, true);
        assert!(grid.is_occupied(12));
        assert!(grid.is_occupied(44));

        grid.set_occupied(12, false);
        assert!(!grid.is_occupied(12));
        assert_eq!(grid.occupied_count(), 1);

        // Out of range is ignored rather than wrapped
        grid.set_occupied(64, true);
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_diff_tracks_a_move() {
        // A piece moves from square 8 to square 16
        let before = SensorGrid::new((1 << 8) | (1 << 40));
        let after = SensorGrid::new((1 << 16) | (1 << 40));

        let lifted = after.lifted_since(before);
        let placed = after.placed_since(before);
        assert!(lifted.is_occupied(8));
        assert_eq!(lifted.occupied_count(), 1);
        assert!(placed.is_occupied(16));
        assert_eq!(placed.occupied_count(), 1);
    }
}
