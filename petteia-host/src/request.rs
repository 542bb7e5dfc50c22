//! Operator request grammar
//!
//! Line-oriented text form used by host front ends (an operator console, a
//! match-scripting layer piping into stdin): `WRITE <OP> [args...]`.
//!
//! - `WRITE SENSOR` / `WRITE ACK` / `WRITE QUIT` take no arguments
//! - `WRITE LED <r> <g> <b>` takes the three channel values, 0-255
//! - `WRITE MAGNET <x> <y> <on> [...]` takes one or more position/switch
//!   triples, e.g. `WRITE MAGNET 3.5 0.5 true 3.5 4.5 false`
//!
//! Verbs and operation words are uppercase and case-sensitive. Malformed
//! argument lists are reported instead of silently skipped, so a typo in a
//! move batch cannot shrink it. The handshake has no spelling here; session
//! setup belongs to [`crate::session`], not to operators.

use std::str::FromStr;

use crate::encode::{self, MoveStep};
use petteia_protocol::RGB8;

/// Errors parsing a request line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Nothing but whitespace, or the operation word is missing
    #[error("empty request")]
    Empty,

    /// Verb or operation word not recognized
    #[error("unknown request word `{0}`")]
    Unknown(String),

    /// Argument list does not fit the operation
    #[error("malformed arguments for {op}: {reason}")]
    MalformedArgs {
        op: &'static str,
        reason: &'static str,
    },
}

/// A parsed operator request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Send a ready-built instruction frame down the link
    Write(Vec<u8>),
}

impl Request {
    /// The frame this request sends
    pub fn frame(&self) -> &[u8] {
        match self {
            Request::Write(frame) => frame,
        }
    }
}

impl FromStr for Request {
    type Err = RequestError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_ascii_whitespace();

        match words.next() {
            Some("WRITE") => {}
            Some(other) => return Err(RequestError::Unknown(other.to_owned())),
            None => return Err(RequestError::Empty),
        }

        let op = words.next().ok_or(RequestError::Empty)?;
        let args: Vec<&str> = words.collect();

        let frame = match op {
            "SENSOR" => encode::sensor(),
            "ACK" => encode::ack(),
            "QUIT" => encode::quit(),
            "LED" => parse_led(&args)?,
            "MAGNET" => parse_magnet(&args)?,
            other => return Err(RequestError::Unknown(other.to_owned())),
        };
        Ok(Request::Write(frame))
    }
}

fn parse_led(args: &[&str]) -> Result<Vec<u8>, RequestError> {
    let [r, g, b] = args else {
        return Err(RequestError::MalformedArgs {
            op: "LED",
            reason: "expected exactly three channel values",
        });
    };
    let channel = |word: &str| {
        word.parse::<u8>().map_err(|_| RequestError::MalformedArgs {
            op: "LED",
            reason: "channel values are 0-255",
        })
    };
    Ok(encode::led(RGB8::new(channel(r)?, channel(g)?, channel(b)?)))
}

fn parse_magnet(args: &[&str]) -> Result<Vec<u8>, RequestError> {
    if args.is_empty() || args.len() % 3 != 0 {
        return Err(RequestError::MalformedArgs {
            op: "MAGNET",
            reason: "expected one or more `x y on` triples",
        });
    }

    let mut steps = Vec::with_capacity(args.len() / 3);
    for triple in args.chunks_exact(3) {
        let x = triple[0].parse::<f32>();
        let y = triple[1].parse::<f32>();
        let on = triple[2].parse::<bool>();
        match (x, y, on) {
            (Ok(x), Ok(y), Ok(magnet_on)) => steps.push(MoveStep { x, y, magnet_on }),
            _ => {
                return Err(RequestError::MalformedArgs {
                    op: "MAGNET",
                    reason: "triples are `f32 f32 bool`",
                })
            }
        }
    }

    encode::magnet(&steps).ok_or(RequestError::MalformedArgs {
        op: "MAGNET",
        reason: "expected one or more `x y on` triples",
    })
}
