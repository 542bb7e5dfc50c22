//! Session handshake, peripheral side
//!
//! Before ordinary instructions flow, the host opens the session with a
//! two-round exchange:
//!
//! ```text
//! host                           board
//!  │ ── [HANDSHAKE, id] ───────────► │   initiation
//!  │ ◄─────────── [HANDSHAKE, id] ── │   verbatim echo
//!  │ ── [HANDSHAKE, id] ───────────► │   readback
//!  │ ◄───────────────────── [ACK] ── │   established
//! ```
//!
//! The board polls for the initiation without blocking, echoes a valid one
//! back, then waits for the host to repeat the frame. A matching readback is
//! answered with a single acknowledgement byte and the session is up. A
//! mismatched readback is dropped and the wait continues; by default there
//! is no timeout, which mirrors the board's power-up behavior of sitting
//! silent until a host appears. [`Handshake::run_until`] bounds the wait for
//! callers that need a way out.
//!
//! A malformed initiation (any waiting byte count other than two, or a first
//! byte that is not the handshake opcode) is drained off the link and
//! ignored; no peer id is captured and the next poll starts over.

use heapless::Vec;

use crate::link::{write_ack, SerialLink};
use crate::opcode::OP_HANDSHAKE;

/// Exact length of an initiation or readback frame
pub const HANDSHAKE_FRAME_LEN: usize = 2;

/// Receive scratch capacity for one initiation poll
///
/// Any count other than exactly two waiting bytes is malformed whatever the
/// content, so longer bursts are drained in capped slices.
pub const INIT_SCRATCH_LEN: usize = 8;

/// Protocol phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandshakePhase {
    /// No valid initiation seen yet
    Idle,
    /// Initiation echoed, waiting for the readback
    AwaitingReadback,
    /// Readback matched and the acknowledgement is out
    Established,
}

/// Outcome of one non-blocking poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandshakeStatus {
    /// Session not established yet; poll again later
    Pending,
    /// Session established
    Established,
}

/// Peripheral-side handshake state machine
///
/// Runs once per power-up session. `Established` is terminal: further polls
/// report success without touching the link, and the captured peer id stays
/// valid until [`Handshake::reset`].
#[derive(Debug, Clone)]
pub struct Handshake {
    phase: HandshakePhase,
    peer_id: Option<u8>,
}

impl Default for Handshake {
    fn default() -> Self {
        Self::new()
    }
}

impl Handshake {
    /// Create a handshake in the idle phase
    pub fn new() -> Self {
        Self {
            phase: HandshakePhase::Idle,
            peer_id: None,
        }
    }

    /// Current protocol phase
    pub fn phase(&self) -> HandshakePhase {
        self.phase
    }

    /// Peer id captured from the initiation, if one has arrived
    pub fn peer_id(&self) -> Option<u8> {
        self.peer_id
    }

    /// Returns true once the session is established
    pub fn is_established(&self) -> bool {
        self.phase == HandshakePhase::Established
    }

    /// Forget the session so a new handshake can run after a disconnect
    pub fn reset(&mut self) {
        self.phase = HandshakePhase::Idle;
        self.peer_id = None;
    }

    /// Advance the handshake by at most one exchange.
    ///
    /// Never blocks beyond a committed read: with nothing (or too little)
    /// waiting on the link this returns [`HandshakeStatus::Pending`]
    /// immediately.
    pub fn poll<L: SerialLink>(&mut self, link: &mut L) -> Result<HandshakeStatus, L::Error> {
        match self.phase {
            HandshakePhase::Idle => self.poll_initiation(link),
            HandshakePhase::AwaitingReadback => self.poll_readback(link),
            HandshakePhase::Established => Ok(HandshakeStatus::Established),
        }
    }

    /// Run the handshake the way the board's control loop does at boot.
    ///
    /// Returns `Ok(false)` right away while no initiation is waiting, so the
    /// caller can keep doing startup work and try again. Once a valid
    /// initiation arrives, blocks until the readback matches and then
    /// returns `Ok(true)`. The readback wait has no timeout; see
    /// [`Self::run_until`].
    pub fn run<L: SerialLink>(&mut self, link: &mut L) -> Result<bool, L::Error> {
        self.run_until(link, || false)
    }

    /// Like [`Self::run`], but with a way out of the readback wait.
    ///
    /// `cancel` is checked between polls; returning true abandons the wait
    /// with `Ok(false)`, leaving the phase as it was so a later call can
    /// pick the exchange back up.
    pub fn run_until<L, F>(&mut self, link: &mut L, mut cancel: F) -> Result<bool, L::Error>
    where
        L: SerialLink,
        F: FnMut() -> bool,
    {
        self.poll(link)?;
        if self.phase == HandshakePhase::Idle {
            return Ok(false);
        }
        while !self.is_established() {
            if cancel() {
                return Ok(false);
            }
            self.poll(link)?;
        }
        Ok(true)
    }

    fn poll_initiation<L: SerialLink>(
        &mut self,
        link: &mut L,
    ) -> Result<HandshakeStatus, L::Error> {
        let available = link.bytes_available()?;
        if available == 0 {
            return Ok(HandshakeStatus::Pending);
        }

        let take = available.min(INIT_SCRATCH_LEN);
        let mut frame: Vec<u8, INIT_SCRATCH_LEN> = Vec::new();
        // Cannot fail: take is capped at the scratch capacity
        let _ = frame.resize(take, 0);
        link.read_blocking(&mut frame)?;

        if available == HANDSHAKE_FRAME_LEN && frame[0] == OP_HANDSHAKE {
            self.peer_id = Some(frame[1]);
            link.write_blocking(&frame)?;
            self.phase = HandshakePhase::AwaitingReadback;
        }
        // Anything else was drained and is dropped without capturing an id
        Ok(HandshakeStatus::Pending)
    }

    fn poll_readback<L: SerialLink>(&mut self, link: &mut L) -> Result<HandshakeStatus, L::Error> {
        if link.bytes_available()? < HANDSHAKE_FRAME_LEN {
            return Ok(HandshakeStatus::Pending);
        }

        let mut frame = [0u8; HANDSHAKE_FRAME_LEN];
        link.read_blocking(&mut frame)?;

        if frame[0] == OP_HANDSHAKE && self.peer_id == Some(frame[1]) {
            write_ack(link)?;
            self.phase = HandshakePhase::Established;
            return Ok(HandshakeStatus::Established);
        }
        // Mismatch: drop the frame and keep waiting
        Ok(HandshakeStatus::Pending)
    }
}
