//! OSC 1.0 message encoder.
//!
//! ```text
//!   address  "/touch\0\0"        NUL-terminated, padded to 4 bytes
//!   tags     ",i\0\0"            one tag per argument
//!   args     00 00 00 03         big-endian, strings padded like the address
//! ```
//!
//! Bundles and timetags are never produced.

use crate::app::events::EventArg;
use crate::app::ports::EventEncoder;

#[derive(Debug, Clone, Copy, Default)]
pub struct OscEncoder;

impl OscEncoder {
    pub fn new() -> Self {
        Self
    }
}

/// Append `s` with a NUL terminator, padded to a 4-byte boundary.
fn push_padded_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
    let pad = 4 - (s.len() % 4);
    out.extend(core::iter::repeat_n(0u8, pad));
}

fn type_tag(arg: &EventArg) -> char {
    match arg {
        EventArg::Int(_) => 'i',
        EventArg::Float(_) => 'f',
        EventArg::Str(_) => 's',
    }
}

impl EventEncoder for OscEncoder {
    fn encode_event(&self, path: &str, args: &[EventArg]) -> Vec<u8> {
        let mut out = Vec::with_capacity(32);
        push_padded_str(&mut out, path);

        let mut tags = String::with_capacity(args.len() + 1);
        tags.push(',');
        tags.extend(args.iter().map(type_tag));
        push_padded_str(&mut out, &tags);

        for arg in args {
            match arg {
                EventArg::Int(v) => out.extend_from_slice(&v.to_be_bytes()),
                EventArg::Float(v) => out.extend_from_slice(&v.to_bits().to_be_bytes()),
                EventArg::Str(s) => push_padded_str(&mut out, s),
            }
        }
        out
    }
}
