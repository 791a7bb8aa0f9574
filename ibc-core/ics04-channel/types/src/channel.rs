//! Implementation of channel ends.
//!
//! A channel end here folds in what a connection would carry: the local
//! client tracking the counterparty, the counterparty's store prefix and the
//! delay period applied to proofs. Handshakes happen outside the core, hosts
//! provision open channel ends directly.

use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;
use core::time::Duration;

use ibc_relay_commitment_types::commitment::CommitmentPrefix;
use ibc_relay_host_types::error::DecodingError;
use ibc_relay_host_types::identifiers::{ChannelId, ClientId, PortId};
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::proto::Protobuf;

use crate::error::ChannelError;
use crate::Version;

/// Wire form of a [`ChannelEnd`], as stored under the channel end path.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawChannelEnd {
    #[prost(int32, tag = "1")]
    pub state: i32,
    #[prost(int32, tag = "2")]
    pub ordering: i32,
    #[prost(message, optional, tag = "3")]
    pub counterparty: Option<RawCounterparty>,
    #[prost(string, tag = "4")]
    pub client_id: String,
    #[prost(bytes = "vec", tag = "5")]
    pub counterparty_prefix: Vec<u8>,
    #[prost(uint64, tag = "6")]
    pub delay_period: u64,
    #[prost(string, tag = "7")]
    pub version: String,
}

/// Wire form of a channel [`Counterparty`].
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawCounterparty {
    #[prost(string, tag = "1")]
    pub port_id: String,
    #[prost(string, tag = "2")]
    pub channel_id: String,
    #[prost(string, tag = "3")]
    pub client_id: String,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelEnd {
    pub state: State,
    pub ordering: Order,
    pub remote: Counterparty,
    /// The local client tracking the counterparty chain.
    pub client_id: ClientId,
    pub counterparty_prefix: CommitmentPrefix,
    pub delay_period: Duration,
    pub version: Version,
}

mod sealed {
    use super::*;

    #[cfg_attr(
        feature = "borsh",
        derive(borsh::BorshSerialize, borsh::BorshDeserialize)
    )]
    struct InnerChannelEnd {
        state: State,
        ordering: Order,
        remote: Counterparty,
        client_id: ClientId,
        counterparty_prefix: CommitmentPrefix,
        delay_period_secs: u64,
        delay_period_nanos: u32,
        version: Version,
    }

    impl From<InnerChannelEnd> for ChannelEnd {
        fn from(value: InnerChannelEnd) -> Self {
            Self {
                state: value.state,
                ordering: value.ordering,
                remote: value.remote,
                client_id: value.client_id,
                counterparty_prefix: value.counterparty_prefix,
                delay_period: Duration::new(value.delay_period_secs, value.delay_period_nanos),
                version: value.version,
            }
        }
    }

    impl From<ChannelEnd> for InnerChannelEnd {
        fn from(value: ChannelEnd) -> Self {
            Self {
                state: value.state,
                ordering: value.ordering,
                remote: value.remote,
                client_id: value.client_id,
                counterparty_prefix: value.counterparty_prefix,
                delay_period_secs: value.delay_period.as_secs(),
                delay_period_nanos: value.delay_period.subsec_nanos(),
                version: value.version,
            }
        }
    }

    #[cfg(feature = "borsh")]
    impl borsh::BorshSerialize for ChannelEnd {
        fn serialize<W: borsh::io::Write>(&self, writer: &mut W) -> borsh::io::Result<()> {
            let value = InnerChannelEnd::from(self.clone());
            borsh::BorshSerialize::serialize(&value, writer)
        }
    }

    #[cfg(feature = "borsh")]
    impl borsh::BorshDeserialize for ChannelEnd {
        fn deserialize_reader<R: borsh::io::Read>(reader: &mut R) -> borsh::io::Result<Self> {
            let inner = InnerChannelEnd::deserialize_reader(reader)?;
            Ok(ChannelEnd::from(inner))
        }
    }
}

impl Display for ChannelEnd {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "ChannelEnd {{ state: {}, ordering: {}, remote: {}, client_id: {}, delay_period: {:?}, version: {} }}",
            self.state, self.ordering, self.remote, self.client_id, self.delay_period, self.version
        )
    }
}

impl Protobuf<RawChannelEnd> for ChannelEnd {}

impl TryFrom<RawChannelEnd> for ChannelEnd {
    type Error = ChannelError;

    fn try_from(value: RawChannelEnd) -> Result<Self, Self::Error> {
        let state = State::from_i32(value.state)?;
        let ordering = Order::from_i32(value.ordering)?;

        let remote = value
            .counterparty
            .ok_or(DecodingError::missing_raw_data("channel counterparty"))?
            .try_into()?;

        let counterparty_prefix = CommitmentPrefix::try_from(value.counterparty_prefix)?;

        Ok(ChannelEnd {
            state,
            ordering,
            remote,
            client_id: ClientId::from_str(&value.client_id)?,
            counterparty_prefix,
            delay_period: Duration::from_nanos(value.delay_period),
            version: value.version.into(),
        })
    }
}

impl From<ChannelEnd> for RawChannelEnd {
    fn from(value: ChannelEnd) -> Self {
        RawChannelEnd {
            state: value.state as i32,
            ordering: value.ordering as i32,
            counterparty: Some(value.remote.into()),
            client_id: value.client_id.to_string(),
            counterparty_prefix: value.counterparty_prefix.into_vec(),
            delay_period: u64::try_from(value.delay_period.as_nanos()).unwrap_or(u64::MAX),
            version: value.version.to_string(),
        }
    }
}

impl ChannelEnd {
    pub fn new(
        state: State,
        ordering: Order,
        remote: Counterparty,
        client_id: ClientId,
        counterparty_prefix: CommitmentPrefix,
        delay_period: Duration,
        version: Version,
    ) -> Self {
        Self {
            state,
            ordering,
            remote,
            client_id,
            counterparty_prefix,
            delay_period,
            version,
        }
    }

    pub fn set_state(&mut self, s: State) {
        self.state = s;
    }

    pub fn is_open(&self) -> bool {
        self.state == State::Open
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn ordering(&self) -> &Order {
        &self.ordering
    }

    pub fn counterparty(&self) -> &Counterparty {
        &self.remote
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn counterparty_prefix(&self) -> &CommitmentPrefix {
        &self.counterparty_prefix
    }

    pub fn delay_period(&self) -> Duration {
        self.delay_period
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn verify_state_matches(&self, expected: &State) -> Result<(), ChannelError> {
        if !self.state.eq(expected) {
            return Err(ChannelError::InvalidState {
                expected: expected.to_string(),
                actual: self.state.to_string(),
            });
        }
        Ok(())
    }

    /// Checks that the packet's counterparty identifiers name this channel's
    /// remote end.
    pub fn verify_counterparty_matches(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(), ChannelError> {
        if &self.remote.port_id != port_id || &self.remote.channel_id != channel_id {
            return Err(ChannelError::MismatchedCounterparty {
                expected: format!("{}/{}", self.remote.port_id, self.remote.channel_id),
                actual: format!("{port_id}/{channel_id}"),
            });
        }
        Ok(())
    }
}

/// The remote end of a channel: its port and channel, and the counterparty's
/// client tracking this chain.
#[cfg_attr(
    feature = "parity-scale-codec",
    derive(
        parity_scale_codec::Encode,
        parity_scale_codec::Decode,
        scale_info::TypeInfo
    )
)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Counterparty {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub client_id: ClientId,
}

impl Counterparty {
    pub fn new(port_id: PortId, channel_id: ChannelId, client_id: ClientId) -> Self {
        Self {
            port_id,
            channel_id,
            client_id,
        }
    }

    pub fn port_id(&self) -> &PortId {
        &self.port_id
    }

    pub fn channel_id(&self) -> &ChannelId {
        &self.channel_id
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }
}

impl Display for Counterparty {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "Counterparty(port_id: {}, channel_id: {}, client_id: {})",
            self.port_id, self.channel_id, self.client_id
        )
    }
}

impl Protobuf<RawCounterparty> for Counterparty {}

impl TryFrom<RawCounterparty> for Counterparty {
    type Error = ChannelError;

    fn try_from(raw_counterparty: RawCounterparty) -> Result<Self, Self::Error> {
        Ok(Counterparty::new(
            raw_counterparty.port_id.parse()?,
            raw_counterparty.channel_id.parse()?,
            raw_counterparty.client_id.parse()?,
        ))
    }
}

impl From<Counterparty> for RawCounterparty {
    fn from(value: Counterparty) -> Self {
        RawCounterparty {
            port_id: value.port_id.to_string(),
            channel_id: value.channel_id.to_string(),
            client_id: value.client_id.to_string(),
        }
    }
}

/// Packet ordering of a channel.
#[cfg_attr(
    feature = "parity-scale-codec",
    derive(
        parity_scale_codec::Encode,
        parity_scale_codec::Decode,
        scale_info::TypeInfo
    )
)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Unordered = 1isize,
    Ordered = 2isize,
}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unordered => "ORDER_UNORDERED",
            Self::Ordered => "ORDER_ORDERED",
        }
    }

    // Parses the Order out from a i32.
    pub fn from_i32(nr: i32) -> Result<Self, ChannelError> {
        match nr {
            1 => Ok(Self::Unordered),
            2 => Ok(Self::Ordered),
            _ => Err(ChannelError::InvalidOrderType {
                expected: "Must be one of 1, 2".to_string(),
                actual: nr.to_string(),
            }),
        }
    }
}

impl FromStr for Order {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim_start_matches("order_") {
            "unordered" => Ok(Self::Unordered),
            "ordered" => Ok(Self::Ordered),
            _ => Err(ChannelError::InvalidOrderType {
                expected: "Must be one of 'unordered', 'ordered'".to_string(),
                actual: s.to_string(),
            }),
        }
    }
}

/// State of a provisioned channel end.
#[cfg_attr(
    feature = "parity-scale-codec",
    derive(
        parity_scale_codec::Encode,
        parity_scale_codec::Decode,
        scale_info::TypeInfo
    )
)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Open = 1isize,
    Closed = 2isize,
}

impl State {
    pub fn as_string(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }

    // Parses the State out from a i32.
    pub fn from_i32(s: i32) -> Result<Self, ChannelError> {
        match s {
            1 => Ok(Self::Open),
            2 => Ok(Self::Closed),
            _ => Err(ChannelError::InvalidState {
                expected: "Must be one of: 1, 2".to_string(),
                actual: s.to_string(),
            }),
        }
    }

    pub fn is_open(self) -> bool {
        self == State::Open
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_end() -> ChannelEnd {
        ChannelEnd::new(
            State::Open,
            Order::Ordered,
            Counterparty::new(
                "transfer".parse().expect("valid port"),
                ChannelId::new(7),
                "9999-mock-3".parse().expect("valid client id"),
            ),
            "9999-mock-0".parse().expect("valid client id"),
            CommitmentPrefix::try_from(b"ibc".to_vec()).expect("non-empty prefix"),
            Duration::from_secs(10),
            Version::new("ics20-1".to_string()),
        )
    }

    #[test]
    fn channel_end_protobuf_round_trip() {
        let channel_end = channel_end();

        let bytes = Protobuf::<RawChannelEnd>::encode_vec(channel_end.clone());
        let decoded =
            <ChannelEnd as Protobuf<RawChannelEnd>>::decode_vec(&bytes).expect("decodes");

        assert_eq!(decoded, channel_end);
    }

    #[test]
    fn unknown_state_is_rejected() {
        let raw = RawChannelEnd {
            state: 0,
            ..channel_end().into()
        };

        assert!(matches!(
            ChannelEnd::try_from(raw),
            Err(ChannelError::InvalidState { .. })
        ));
    }

    #[test]
    fn counterparty_mismatch_is_reported() {
        let channel_end = channel_end();
        let port_id: PortId = "transfer".parse().expect("valid port");

        assert!(channel_end
            .verify_counterparty_matches(&port_id, &ChannelId::new(7))
            .is_ok());
        assert!(matches!(
            channel_end.verify_counterparty_matches(&port_id, &ChannelId::new(8)),
            Err(ChannelError::MismatchedCounterparty { .. })
        ));
    }
}
