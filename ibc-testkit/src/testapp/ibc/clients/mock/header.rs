use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_relay_core::client::types::error::ClientError;
use ibc_relay_core::client::types::Height;
use ibc_relay_core::primitives::prelude::*;
use ibc_relay_core::primitives::proto::{Any, Protobuf};
use ibc_relay_core::primitives::Timestamp;

use super::proto::Header as RawMockHeader;
use crate::utils::year_2023;

pub const MOCK_HEADER_TYPE_URL: &str = "/ibc.mock.Header";

/// The block header of a mock chain: a height and the time it was produced.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MockHeader {
    pub height: Height,
    pub timestamp: Timestamp,
}

impl Default for MockHeader {
    fn default() -> Self {
        Self {
            height: Height::min(0),
            timestamp: year_2023(),
        }
    }
}

impl Display for MockHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "MockHeader {{ height: {}, timestamp: {} }}",
            self.height, self.timestamp
        )
    }
}

impl MockHeader {
    pub fn new(height: Height, timestamp: Timestamp) -> Self {
        Self { height, timestamp }
    }

    pub fn height(&self) -> Height {
        self.height
    }
}

impl Protobuf<RawMockHeader> for MockHeader {}

impl TryFrom<RawMockHeader> for MockHeader {
    type Error = ClientError;

    fn try_from(raw: RawMockHeader) -> Result<Self, Self::Error> {
        Ok(Self {
            height: raw
                .height
                .ok_or(ClientError::InvalidClientMessage {
                    description: "missing header height".into(),
                })?
                .into(),
            timestamp: Timestamp::from_nanoseconds(raw.timestamp).map_err(|e| {
                ClientError::InvalidClientMessage {
                    description: e.to_string(),
                }
            })?,
        })
    }
}

impl From<MockHeader> for RawMockHeader {
    fn from(value: MockHeader) -> Self {
        Self {
            height: Some(value.height.into()),
            timestamp: value.timestamp.nanoseconds(),
        }
    }
}

impl Protobuf<Any> for MockHeader {}

impl TryFrom<Any> for MockHeader {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        match raw.type_url.as_str() {
            MOCK_HEADER_TYPE_URL => <Self as Protobuf<RawMockHeader>>::decode_vec(&raw.value).map_err(|e| {
                ClientError::InvalidClientMessage {
                    description: e.to_string(),
                }
            }),
            _ => Err(ClientError::InvalidClientMessage {
                description: format!("unexpected type URL `{}`", raw.type_url),
            }),
        }
    }
}

impl From<MockHeader> for Any {
    fn from(header: MockHeader) -> Self {
        Any {
            type_url: MOCK_HEADER_TYPE_URL.to_string(),
            value: Protobuf::<RawMockHeader>::encode_vec(header),
        }
    }
}
