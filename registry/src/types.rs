//! Domain types for the taxpayer registry.
//!
//! A taxpayer is identified by a backend-assigned `tid`. IDs are unbounded
//! naturals on the backend side, so they are held as `u128` here and always
//! travel as decimal strings on the wire to stay exact in every client.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Backend-assigned taxpayer identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaxpayerId(u128);

impl TaxpayerId {
    /// Creates a `TaxpayerId` from its numeric value
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u128 {
        self.0
    }
}

impl From<u64> for TaxpayerId {
    fn from(value: u64) -> Self {
        Self(u128::from(value))
    }
}

impl fmt::Display for TaxpayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a piece of text is not a taxpayer ID
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTaxpayerId {
    /// Nothing was entered
    #[error("Enter a taxpayer ID to search")]
    Empty,

    /// Something other than decimal digits was entered
    #[error("\"{0}\" is not a valid taxpayer ID")]
    NotANumber(String),

    /// The number does not fit the ID range
    #[error("\"{0}\" is too large to be a taxpayer ID")]
    OutOfRange(String),
}

impl FromStr for TaxpayerId {
    type Err = InvalidTaxpayerId;

    /// Parses decimal digits, ignoring surrounding whitespace.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let digits = input.trim();

        if digits.is_empty() {
            return Err(InvalidTaxpayerId::Empty);
        }

        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidTaxpayerId::NotANumber(digits.to_string()));
        }

        digits
            .parse::<u128>()
            .map(Self)
            .map_err(|_| InvalidTaxpayerId::OutOfRange(digits.to_string()))
    }
}

impl Serialize for TaxpayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct TaxpayerIdVisitor;

impl Visitor<'_> for TaxpayerIdVisitor {
    type Value = TaxpayerId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a string of decimal digits")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<TaxpayerId, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<TaxpayerId, E> {
        Ok(TaxpayerId::from(value))
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<TaxpayerId, E> {
        Ok(TaxpayerId(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<TaxpayerId, E> {
        u64::try_from(value)
            .map(TaxpayerId::from)
            .map_err(|_| E::custom(format!("taxpayer ID cannot be negative: {value}")))
    }
}

impl<'de> Deserialize<'de> for TaxpayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TaxpayerIdVisitor)
    }
}

/// A taxpayer record as held by the backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Taxpayer {
    /// Backend-assigned identifier
    pub tid: TaxpayerId,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Postal address
    pub address: String,
}

impl Taxpayer {
    /// Creates a taxpayer record
    #[must_use]
    pub fn new(
        tid: TaxpayerId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            tid,
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
        }
    }
}

/// The user-supplied fields of a taxpayer that does not exist yet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaxpayer {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Postal address
    pub address: String,
}

impl NewTaxpayer {
    /// Creates the fields for a new taxpayer
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
        }
    }

    /// Attaches a backend-assigned ID
    #[must_use]
    pub fn with_tid(self, tid: TaxpayerId) -> Taxpayer {
        Taxpayer {
            tid,
            first_name: self.first_name,
            last_name: self.last_name,
            address: self.address,
        }
    }
}
