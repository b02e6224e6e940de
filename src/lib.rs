//! Compact, lexicographically sortable 12-byte object identifiers
//!
//! ```rust
//! let id = bid::bid();
//! println!("{}", id); // e.g. "XrRPlHwdyRQ2ZzYP"
//! println!("{:?}", id.as_bytes()); // as 12-byte big-endian array
//! ```
//!
//! # Field and byte layout
//!
//! An identifier packs four fields big-endian, contiguous, no padding:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            seconds                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                    machine                    |    pid (hi)   |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |    pid (lo)   |                    counter                    |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 32-bit `seconds` field holds the Unix timestamp of generation, at
//!   second resolution (UTC).
//! - The 3-byte `machine` field holds the first three bytes of a hash of
//!   the generating host's name.
//! - The 16-bit `pid` field holds the low 16 bits of the generating
//!   process's id.
//! - The 24-bit `counter` field holds an atomically incremented sequence
//!   value, seeded from the clock at process start, wrapping at 2^24.
//!
//! Because the timestamp leads and every field is big-endian, sorting
//! identifiers by their raw bytes sorts them by generation time.
//!
//! # External representations
//!
//! The raw 12 bytes are the canonical form. Derived from it are a
//! 24-character lowercase hex form, a 16-character URL-safe unpadded
//! base64 form (the default string form; the zero identifier displays as
//! the empty string), and a JSON form carrying the base64 body. The
//! tolerant parser behind [`Bid::parse_bytes`] accepts any of them,
//! dispatching on input shape. Identifiers are unique with high
//! probability and sortable, not secret; none of the representations is
//! meant to resist guessing.

mod id;
pub use id::Bid;

mod error;
pub use error::Error;

mod generator;
pub use generator::Generator;

mod global;
pub use global::{bid, bid_at};

mod value;
pub use value::{from_any, AutoBid, IntoBid, Value};
