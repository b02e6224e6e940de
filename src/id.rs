use std::time::{Duration, SystemTime, UNIX_EPOCH};
use std::{fmt, str};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use crate::Error;

/// Represents a compact, sortable 12-byte object identifier.
///
/// The raw 12-byte array is the canonical form; comparing identifiers byte
/// for byte orders them by generation time, then machine, process, and
/// counter. See the crate documentation for the byte layout.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Bid([u8; 12]);

impl Bid {
    /// The zero identifier (all 12 bytes zero).
    ///
    /// The zero identifier is a valid value that encodes to an empty
    /// external representation; it marks a record that has not been
    /// assigned an identifier yet.
    pub const ZERO: Self = Self([0x00; 12]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Returns `true` if all 12 bytes are zero.
    pub const fn is_zero(&self) -> bool {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]) == 0
            && u32::from_be_bytes([self.0[4], self.0[5], self.0[6], self.0[7]]) == 0
            && u32::from_be_bytes([self.0[8], self.0[9], self.0[10], self.0[11]]) == 0
    }

    /// Resets the identifier to [`Bid::ZERO`].
    pub fn reset(&mut self) {
        *self = Self::ZERO;
    }

    /// Creates an identifier from its field values.
    ///
    /// The counter is truncated to its low 24 bits; values past 2^24 wrap
    /// silently.
    pub const fn from_parts(secs: u32, machine: [u8; 3], pid: u16, counter: u32) -> Self {
        Self([
            (secs >> 24) as u8,
            (secs >> 16) as u8,
            (secs >> 8) as u8,
            secs as u8,
            machine[0],
            machine[1],
            machine[2],
            (pid >> 8) as u8,
            pid as u8,
            (counter >> 16) as u8,
            (counter >> 8) as u8,
            counter as u8,
        ])
    }

    /// Returns an identifier with only the timestamp part filled in and all
    /// other parts zero.
    ///
    /// The result is not unique and must never be stored as a real key; it
    /// is useful only for range queries over records generated before or
    /// after the given time.
    pub fn from_time(t: SystemTime) -> Self {
        Self::from_parts(unix_secs(t), [0; 3], 0, 0)
    }

    /// Returns the timestamp part as seconds since the Unix epoch.
    pub const fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Returns the timestamp part, at second resolution (UTC).
    pub fn time(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.timestamp() as u64)
    }

    /// Returns the 3-byte machine fingerprint part.
    pub const fn machine(&self) -> [u8; 3] {
        [self.0[4], self.0[5], self.0[6]]
    }

    /// Returns the process id part (low 16 bits of the generating process).
    pub const fn pid(&self) -> u16 {
        u16::from_be_bytes([self.0[7], self.0[8]])
    }

    /// Returns the 24-bit counter part.
    pub const fn counter(&self) -> u32 {
        u32::from_be_bytes([0, self.0[9], self.0[10], self.0[11]])
    }

    /// Returns the 24-character lowercase hex representation.
    pub fn hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the 16-character URL-safe unpadded base64 representation.
    ///
    /// This is the default string form; [`Display`](fmt::Display) emits it
    /// for every identifier except [`Bid::ZERO`], which displays as the
    /// empty string.
    pub fn b64(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Returns whether `s` is a 24-character hex representation of an
    /// identifier.
    pub fn is_hex(s: &str) -> bool {
        s.len() == 24 && s.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Returns whether `s` is a `'0'`-marked base64 representation of an
    /// identifier, as recognized by [`Bid::parse_bytes`].
    pub fn is_b64(s: &str) -> bool {
        match s.as_bytes() {
            [b'0', rest @ ..] => matches!(URL_SAFE_NO_PAD.decode(rest), Ok(d) if d.len() == 12),
            _ => false,
        }
    }

    /// Decodes a 24-character hex representation.
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let mut raw = [0u8; 12];
        match hex::decode_to_slice(s, &mut raw) {
            Ok(()) => Ok(Self(raw)),
            Err(source) => Err(Error::Hex {
                input: s.to_owned(),
                source,
            }),
        }
    }

    /// Decodes a bare (unmarked) URL-safe unpadded base64 representation.
    ///
    /// The empty string decodes to [`Bid::ZERO`]. This is the decoder
    /// behind the JSON form; the shape-dispatching [`Bid::parse_bytes`]
    /// instead expects base64 input to carry a leading `'0'` marker.
    pub fn from_b64(s: &str) -> Result<Self, Error> {
        if s.is_empty() {
            return Ok(Self::ZERO);
        }
        let decoded = URL_SAFE_NO_PAD.decode(s).map_err(|source| Error::Base64 {
            input: s.to_owned(),
            source,
        })?;
        <[u8; 12]>::try_from(decoded.as_slice())
            .map(Self)
            .map_err(|_| Error::Base64Length(s.to_owned()))
    }

    /// Creates an identifier from any of the recognized input shapes.
    ///
    /// The input is dispatched on its shape, in order:
    ///
    /// - exactly 12 raw bytes are taken as-is (the canonical form);
    /// - an empty slice or a single space normalizes to [`Bid::ZERO`];
    /// - a leading ASCII `'0'` marks the remainder as base64;
    /// - exactly 24 bytes are decoded as hex;
    /// - anything else is an error naming the input.
    ///
    /// A base64 or hex payload that does not decode to exactly 12 bytes is
    /// an error, never a truncation.
    pub fn parse_bytes(data: &[u8]) -> Result<Self, Error> {
        if let Ok(raw) = <[u8; 12]>::try_from(data) {
            return Ok(Self(raw));
        }
        if data.is_empty() || data == b" " {
            return Ok(Self::ZERO);
        }
        if data[0] == b'0' {
            return match URL_SAFE_NO_PAD.decode(&data[1..]) {
                Ok(decoded) => <[u8; 12]>::try_from(decoded.as_slice())
                    .map(Self)
                    .map_err(|_| Error::Base64Length(lossy(data))),
                Err(source) => Err(Error::Base64 {
                    input: lossy(data),
                    source,
                }),
            };
        }
        if data.len() == 24 {
            let mut raw = [0u8; 12];
            return match hex::decode_to_slice(data, &mut raw) {
                Ok(()) => Ok(Self(raw)),
                Err(source) => Err(Error::Hex {
                    input: lossy(data),
                    source,
                }),
            };
        }
        Err(Error::UnknownFormat(lossy(data)))
    }

    /// Creates an identifier from a string, dispatching on the string's
    /// byte content exactly as [`Bid::parse_bytes`] does.
    pub fn parse_str(s: &str) -> Result<Self, Error> {
        Self::parse_bytes(s.as_bytes())
    }

    /// Creates an identifier from any recognized input shape, panicking on
    /// malformed input.
    ///
    /// # Panics
    ///
    /// Panics if `data` does not parse. Reserved for inputs the programmer
    /// controls; use [`Bid::parse_bytes`] for untrusted input.
    pub fn must_parse(data: &[u8]) -> Self {
        match Self::parse_bytes(data) {
            Ok(bid) => bid,
            Err(err) => panic!("{}", err),
        }
    }

    /// String counterpart of [`Bid::must_parse`].
    ///
    /// # Panics
    ///
    /// Panics if `s` does not parse.
    pub fn must_parse_str(s: &str) -> Self {
        match Self::parse_str(s) {
            Ok(bid) => bid,
            Err(err) => panic!("{}", err),
        }
    }
}

fn lossy(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}

fn unix_secs(t: SystemTime) -> u32 {
    t.duration_since(UNIX_EPOCH)
        .expect("clock may have gone backwards")
        .as_secs() as u32
}

impl fmt::Display for Bid {
    /// Writes the base64 representation, or nothing for [`Bid::ZERO`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            Ok(())
        } else {
            f.write_str(&self.b64())
        }
    }
}

impl str::FromStr for Bid {
    type Err = Error;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse_str(src)
    }
}

impl From<Bid> for String {
    fn from(src: Bid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Bid {
    type Error = Error;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

impl From<Bid> for [u8; 12] {
    fn from(src: Bid) -> Self {
        src.0
    }
}

impl From<[u8; 12]> for Bid {
    fn from(src: [u8; 12]) -> Self {
        Self(src)
    }
}

impl TryFrom<&[u8]> for Bid {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        Self::parse_bytes(src)
    }
}

impl AsRef<[u8]> for Bid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Bid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Bid {
        /// Serializes as the base64 string (empty for the zero identifier)
        /// in human-readable formats, or as the raw 12 bytes otherwise.
        ///
        /// The two forms are deliberately different: external consumers
        /// rely on the JSON form being base64 and on byte-oriented formats
        /// moving the canonical bytes untouched.
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                if self.is_zero() {
                    serializer.serialize_str("")
                } else {
                    serializer.serialize_str(&self.b64())
                }
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Bid {
        /// Accepts `""` and `null` as the zero identifier, a base64 string
        /// body otherwise; byte-oriented formats supply the raw bytes.
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_any(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Bid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a bid representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Bid::from_b64(value).map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Bid::parse_bytes(value).map_err(de::Error::custom)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Bid::ZERO)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Bid::ZERO)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::Bid;
        use serde_test::{assert_tokens, Configure, Token};

        const RAW: [u8; 12] = [94, 180, 79, 148, 124, 29, 201, 20, 54, 103, 54, 15];

        /// Serializes and deserializes the string and byte forms
        #[test]
        fn serializes_and_deserializes_the_string_and_byte_forms() {
            let e = Bid::from(RAW);
            assert_tokens(&e.readable(), &[Token::Str("XrRPlHwdyRQ2ZzYP")]);
            assert_tokens(&e.compact(), &[Token::Bytes(&RAW)]);
        }

        /// Serializes the zero identifier as an empty string
        #[test]
        fn serializes_the_zero_identifier_as_an_empty_string() {
            assert_tokens(&Bid::ZERO.readable(), &[Token::Str("")]);
        }

        /// Emits and accepts the JSON forms
        #[test]
        fn emits_and_accepts_the_json_forms() {
            let e = Bid::from(RAW);
            let encoded = serde_json::to_string(&e).unwrap();
            assert_eq!(encoded, "\"XrRPlHwdyRQ2ZzYP\"");
            assert_eq!(serde_json::from_str::<Bid>(&encoded).unwrap(), e);

            assert_eq!(serde_json::to_string(&Bid::ZERO).unwrap(), "\"\"");
            assert_eq!(serde_json::from_str::<Bid>("\"\"").unwrap(), Bid::ZERO);
            assert_eq!(serde_json::from_str::<Bid>("null").unwrap(), Bid::ZERO);
        }

        /// Rejects malformed JSON payloads
        #[test]
        fn rejects_malformed_json_payloads() {
            // unterminated string
            assert!(serde_json::from_str::<Bid>("\"XrRPlHwdyRQ2ZzYP").is_err());
            // base64 body of the wrong length
            assert!(serde_json::from_str::<Bid>("\"XrRPlRQ2ZzYP\"").is_err());
            // not a string at all
            assert!(serde_json::from_str::<Bid>("12").is_err());
        }
    }
}
