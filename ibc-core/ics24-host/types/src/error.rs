//! Foundational error types shared by every crate of the workspace.

use alloc::string::{FromUtf8Error, String};
use core::str::Utf8Error;

use displaydoc::Display;
use ibc_relay_primitives::prelude::*;
use prost::DecodeError as ProstError;

/// Errors that originate from host implementations.
#[derive(Debug, Display)]
pub enum HostError {
    /// invalid data: `{description}`
    InvalidData { description: String },
    /// missing data: `{description}`
    MissingData { description: String },
    /// failed to store data: `{description}`
    FailedToStoreData { description: String },
    /// failed to retrieve data from store: `{description}`
    FailedToRetrieveFromStore { description: String },
    /// failed to parse data: `{description}`
    FailedToParseData { description: String },
    /// non-existent type: `{description}`
    NonexistentType { description: String },
    /// other error: `{description}`
    Other { description: String },
}

impl HostError {
    pub fn invalid_data(description: impl ToString) -> Self {
        Self::InvalidData {
            description: description.to_string(),
        }
    }

    pub fn missing_data(description: impl ToString) -> Self {
        Self::MissingData {
            description: description.to_string(),
        }
    }

    pub fn failed_to_store(description: impl ToString) -> Self {
        Self::FailedToStoreData {
            description: description.to_string(),
        }
    }

    pub fn failed_to_retrieve(description: impl ToString) -> Self {
        Self::FailedToRetrieveFromStore {
            description: description.to_string(),
        }
    }

    pub fn other(description: impl ToString) -> Self {
        Self::Other {
            description: description.to_string(),
        }
    }
}

/// Errors that arise when parsing identifiers.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Display)]
pub enum IdentifierError {
    /// id `{id}` has invalid length; must be between [`{min}`,`{max}`]
    InvalidLength { id: String, min: u64, max: u64 },
    /// id `{id}` can only contain alphanumeric characters or `.`, `_`, `+`, `-`, `#`, `[`, `]`, `<`, `>`
    InvalidCharacter { id: String },
    /// invalid prefix: `{prefix}`
    InvalidPrefix { prefix: String },
    /// client id `{id}` carries no client type
    MissingClientType { id: String },
    /// invalid string `{value}` as sequence: `{reason}`
    InvalidStringAsSequence { value: String, reason: String },
}

/// Errors that occur while decoding stored or raw values into domain types.
#[derive(Debug, Display)]
pub enum DecodingError {
    /// identifier error: `{0}`
    Identifier(IdentifierError),
    /// utf-8 String decoding error: `{0}`
    StringUtf8(FromUtf8Error),
    /// utf-8 str decoding error: `{0}`
    StrUtf8(Utf8Error),
    /// prost decoding error: `{0}`
    Prost(ProstError),
    /// invalid raw data: `{description}`
    InvalidRawData { description: String },
    /// missing raw data: `{description}`
    MissingRawData { description: String },
    /// mismatched type URLs: expected `{expected}`, actual `{actual}`
    MismatchedTypeUrls { expected: String, actual: String },
    /// unknown type URL: `{0}`
    UnknownTypeUrl(String),
}

impl DecodingError {
    /// Convenience constructor for raw data that does not match the expected
    /// shape.
    pub fn invalid_raw_data(description: impl ToString) -> Self {
        Self::InvalidRawData {
            description: description.to_string(),
        }
    }

    pub fn missing_raw_data(description: impl ToString) -> Self {
        Self::MissingRawData {
            description: description.to_string(),
        }
    }
}

impl From<IdentifierError> for DecodingError {
    fn from(e: IdentifierError) -> Self {
        Self::Identifier(e)
    }
}

impl From<ProstError> for DecodingError {
    fn from(e: ProstError) -> Self {
        Self::Prost(e)
    }
}

impl From<FromUtf8Error> for DecodingError {
    fn from(e: FromUtf8Error) -> Self {
        Self::StringUtf8(e)
    }
}

impl From<Utf8Error> for DecodingError {
    fn from(e: Utf8Error) -> Self {
        Self::StrUtf8(e)
    }
}

impl From<DecodingError> for HostError {
    fn from(e: DecodingError) -> Self {
        Self::FailedToParseData {
            description: e.to_string(),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IdentifierError {}

#[cfg(feature = "std")]
impl std::error::Error for DecodingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Identifier(e) => Some(e),
            Self::StringUtf8(e) => Some(e),
            Self::StrUtf8(e) => Some(e),
            Self::Prost(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HostError {}
