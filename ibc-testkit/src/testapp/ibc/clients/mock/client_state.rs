use core::str::FromStr;
use core::time::Duration;

use ibc_relay_core::client::types::error::ClientError;
use ibc_relay_core::client::types::Height;
use ibc_relay_core::host::types::identifiers::ClientType;
use ibc_relay_core::primitives::prelude::*;
use ibc_relay_core::primitives::proto::{Any, Protobuf};
use ibc_relay_core::primitives::Timestamp;

use super::header::MockHeader;
use super::proto::ClientState as RawMockClientState;

pub const MOCK_CLIENT_STATE_TYPE_URL: &str = "/ibc.mock.ClientState";
pub const MOCK_CLIENT_TYPE: &str = "9999-mock";

/// Two weeks, long enough that no test chain outlives it by accident.
pub const DEFAULT_TRUSTING_PERIOD: Duration = Duration::from_secs(14 * 24 * 60 * 60);

pub fn client_type() -> ClientType {
    ClientType::from_str(MOCK_CLIENT_TYPE).expect("never fails because it's valid client type")
}

/// A mock of a client state: the latest trusted header, a trusting period
/// after which the client expires, and whether misbehaviour froze it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MockClientState {
    pub header: MockHeader,
    pub trusting_period: Duration,
    pub frozen: bool,
}

impl MockClientState {
    pub fn new(header: MockHeader) -> Self {
        Self {
            header,
            trusting_period: DEFAULT_TRUSTING_PERIOD,
            frozen: false,
        }
    }

    pub fn latest_height(&self) -> Height {
        self.header.height()
    }

    pub fn with_trusting_period(self, trusting_period: Duration) -> Self {
        Self {
            trusting_period,
            ..self
        }
    }

    pub fn frozen(self) -> Self {
        Self {
            frozen: true,
            ..self
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Whether a consensus state produced at `latest` is too old to trust
    /// at `now`. A zero trusting period never expires.
    pub fn is_expired(&self, latest: Timestamp, now: Timestamp) -> bool {
        if self.trusting_period.is_zero() {
            return false;
        }

        now.duration_since(&latest)
            .map_or(false, |elapsed| elapsed > self.trusting_period)
    }
}

impl Protobuf<RawMockClientState> for MockClientState {}

impl TryFrom<RawMockClientState> for MockClientState {
    type Error = ClientError;

    fn try_from(raw: RawMockClientState) -> Result<Self, Self::Error> {
        Ok(Self {
            header: raw
                .header
                .ok_or(ClientError::InvalidClientState {
                    description: "header is not present".into(),
                })?
                .try_into()?,
            trusting_period: Duration::from_secs(raw.trusting_period_secs),
            frozen: raw.frozen,
        })
    }
}

impl From<MockClientState> for RawMockClientState {
    fn from(value: MockClientState) -> Self {
        RawMockClientState {
            header: Some(value.header.into()),
            frozen: value.frozen,
            trusting_period_secs: value.trusting_period.as_secs(),
        }
    }
}

impl Protobuf<Any> for MockClientState {}

impl TryFrom<Any> for MockClientState {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        match raw.type_url.as_str() {
            MOCK_CLIENT_STATE_TYPE_URL => <Self as Protobuf<RawMockClientState>>::decode_vec(&raw.value)
                .map_err(|e| ClientError::InvalidClientState {
                    description: e.to_string(),
                }),
            _ => Err(ClientError::InvalidClientState {
                description: format!("unexpected type URL `{}`", raw.type_url),
            }),
        }
    }
}

impl From<MockClientState> for Any {
    fn from(client_state: MockClientState) -> Self {
        Any {
            type_url: MOCK_CLIENT_STATE_TYPE_URL.to_string(),
            value: Protobuf::<RawMockClientState>::encode_vec(client_state),
        }
    }
}
