//! Conversion at the database driver boundary.

use std::{fmt, ops};

use crate::{bid, Bid, Error};

/// A scalar value exchanged with a database driver.
///
/// The driver layer maps its own value universe onto this closed set before
/// the codec sees it, so every conversion path dispatches on a concrete
/// shape rather than on runtime type inspection.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Bytes(Vec<u8>),
    Int(i64),
    Real(f64),
}

impl Value {
    /// Name of the value kind, for error reporting.
    fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Int(_) => "int",
            Value::Real(_) => "real",
        }
    }
}

impl Bid {
    /// Converts the identifier into a driver value: the empty string for
    /// the zero identifier, the raw 12 bytes otherwise.
    pub fn to_value(&self) -> Value {
        if self.is_zero() {
            Value::Text(String::new())
        } else {
            Value::Bytes(self.as_bytes().to_vec())
        }
    }

    /// Reads an identifier back from a driver value.
    ///
    /// `Null` maps to the zero identifier; byte and text payloads go
    /// through the tolerant parser; any other kind is a type mismatch.
    pub fn from_value(src: Value) -> Result<Self, Error> {
        match src {
            Value::Null => Ok(Self::ZERO),
            Value::Bytes(data) => Self::parse_bytes(&data),
            Value::Text(s) => Self::parse_str(&s),
            other => Err(Error::SourceType(other.kind())),
        }
    }
}

/// A [`Bid`] that generates itself on first conversion to a driver value.
///
/// Embedding one in a record gives "generate on first persist" semantics:
/// the identifier stays zero until [`AutoBid::to_value`] is first called,
/// typically by the driver layer on write.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct AutoBid(Bid);

impl AutoBid {
    /// Returns the inner identifier, which may still be zero.
    pub const fn get(&self) -> Bid {
        self.0
    }

    /// Converts to a driver value, generating a fresh identifier first if
    /// the current one is still zero.
    pub fn to_value(&mut self) -> Value {
        if self.0.is_zero() {
            self.0 = bid();
        }
        self.0.to_value()
    }
}

impl From<Bid> for AutoBid {
    fn from(src: Bid) -> Self {
        Self(src)
    }
}

impl ops::Deref for AutoBid {
    type Target = Bid;

    fn deref(&self) -> &Bid {
        &self.0
    }
}

impl fmt::Display for AutoBid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::AutoBid;
    use crate::Bid;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for AutoBid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.get().serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for AutoBid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Bid::deserialize(deserializer).map(Self::from)
        }
    }
}

/// Conversion into a [`Bid`] at trusted call sites.
///
/// The text and byte impls panic on malformed input, so they belong only
/// where the input is a programmer-controlled literal; untrusted input goes
/// through [`Bid::parse_bytes`] or [`Bid::parse_str`] instead. Domain types
/// that carry an identifier implement this to become acceptable to
/// [`from_any`].
pub trait IntoBid {
    /// Converts `self` into an identifier.
    fn into_bid(self) -> Bid;
}

impl IntoBid for Bid {
    fn into_bid(self) -> Bid {
        self
    }
}

impl IntoBid for &str {
    /// # Panics
    ///
    /// Panics if the string does not parse as an identifier.
    fn into_bid(self) -> Bid {
        Bid::must_parse_str(self)
    }
}

impl IntoBid for String {
    /// # Panics
    ///
    /// Panics if the string does not parse as an identifier.
    fn into_bid(self) -> Bid {
        Bid::must_parse_str(&self)
    }
}

impl IntoBid for &[u8] {
    /// # Panics
    ///
    /// Panics if the bytes do not parse as an identifier.
    fn into_bid(self) -> Bid {
        Bid::must_parse(self)
    }
}

impl IntoBid for Vec<u8> {
    /// # Panics
    ///
    /// Panics if the bytes do not parse as an identifier.
    fn into_bid(self) -> Bid {
        Bid::must_parse(&self)
    }
}

/// Permissive constructor over everything [`IntoBid`].
///
/// # Panics
///
/// Panics when a text or byte payload does not parse; see [`IntoBid`].
///
/// # Examples
///
/// ```rust
/// use bid::from_any;
///
/// let id = from_any("5eb44f947c1dc9143667360f");
/// assert_eq!(from_any(id), id);
/// ```
pub fn from_any(value: impl IntoBid) -> Bid {
    value.into_bid()
}

#[cfg(test)]
mod tests {
    use super::{from_any, AutoBid, IntoBid, Value};
    use crate::{Bid, Error};

    const RAW: [u8; 12] = [94, 180, 79, 148, 124, 29, 201, 20, 54, 103, 54, 15];

    /// Converts the zero identifier to an empty string value
    #[test]
    fn converts_the_zero_identifier_to_an_empty_string_value() {
        assert_eq!(Bid::ZERO.to_value(), Value::Text(String::new()));
    }

    /// Converts a nonzero identifier to its raw bytes
    #[test]
    fn converts_a_nonzero_identifier_to_its_raw_bytes() {
        assert_eq!(Bid::from(RAW).to_value(), Value::Bytes(RAW.to_vec()));
    }

    /// Reads identifiers back from null, byte, and text values
    #[test]
    fn reads_identifiers_back_from_null_byte_and_text_values() {
        assert_eq!(Bid::from_value(Value::Null), Ok(Bid::ZERO));
        assert_eq!(
            Bid::from_value(Value::Bytes(RAW.to_vec())),
            Ok(Bid::from(RAW))
        );
        assert_eq!(
            Bid::from_value(Value::Text("5eb44f947c1dc9143667360f".into())),
            Ok(Bid::from(RAW))
        );
        assert_eq!(Bid::from_value(Value::Text(String::new())), Ok(Bid::ZERO));
    }

    /// Fails closed on unrecognized value kinds
    #[test]
    fn fails_closed_on_unrecognized_value_kinds() {
        assert_eq!(Bid::from_value(Value::Int(7)), Err(Error::SourceType("int")));
        assert_eq!(
            Bid::from_value(Value::Real(7.0)),
            Err(Error::SourceType("real"))
        );
    }

    /// Round-trips an identifier through the driver boundary
    #[test]
    fn round_trips_an_identifier_through_the_driver_boundary() {
        let e = Bid::from(RAW);
        assert_eq!(Bid::from_value(e.to_value()), Ok(e));
        assert_eq!(Bid::from_value(Bid::ZERO.to_value()), Ok(Bid::ZERO));
    }

    /// Generates an identifier on first persist
    #[test]
    fn generates_an_identifier_on_first_persist() {
        let mut auto = AutoBid::default();
        assert!(auto.is_zero());

        let first = auto.to_value();
        assert!(!auto.is_zero());
        assert!(matches!(&first, Value::Bytes(_)));

        // the identifier sticks once generated
        assert_eq!(auto.to_value(), first);
        assert_eq!(auto.get().to_value(), first);
    }

    /// Keeps an assigned identifier on conversion
    #[test]
    fn keeps_an_assigned_identifier_on_conversion() {
        let mut auto = AutoBid::from(Bid::from(RAW));
        assert_eq!(auto.to_value(), Value::Bytes(RAW.to_vec()));
        assert_eq!(auto.get(), Bid::from(RAW));
    }

    /// Accepts identifiers, text, bytes, and capability types
    #[test]
    fn accepts_identifiers_text_bytes_and_capability_types() {
        struct Record {
            id: Bid,
        }

        impl IntoBid for &Record {
            fn into_bid(self) -> Bid {
                self.id
            }
        }

        let e = Bid::from(RAW);
        assert_eq!(from_any(e), e);
        assert_eq!(from_any("5eb44f947c1dc9143667360f"), e);
        assert_eq!(from_any(RAW.as_slice()), e);
        assert_eq!(from_any(&Record { id: e }), e);
    }

    /// Panics on malformed trusted input
    #[test]
    #[should_panic(expected = "invalid bid")]
    fn panics_on_malformed_trusted_input() {
        from_any("not an identifier");
    }
}
