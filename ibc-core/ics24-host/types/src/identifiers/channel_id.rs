use core::fmt::{Debug, Display, Error as FmtError, Formatter};
use core::str::FromStr;

use derive_more::Into;
use ibc_relay_primitives::prelude::*;

use super::ClientId;
use crate::error::IdentifierError;
use crate::validate::validate_packet_channel_identifier;

const CHANNEL_ID_PREFIX: &str = "channel";

/// Identifies the local end of a packet route.
///
/// On a classic route this is a `channel-{N}` identifier. On a lite route the
/// packet carries the local client identifier in its channel fields, which is
/// why parsing accepts any valid identifier and
/// [`ChannelId::as_client_id`] reinterprets it.
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
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Into)]
pub struct ChannelId(String);

impl ChannelId {
    /// Builds a new channel identifier from a monotonically increasing
    /// `counter`, joined to the static prefix (see `ChannelId::prefix()`) by
    /// a dash "-".
    ///
    /// ```
    /// # use ibc_relay_host_types::identifiers::ChannelId;
    /// let chan_id = ChannelId::new(27);
    /// assert_eq!(chan_id.to_string(), "channel-27");
    /// ```
    pub fn new(identifier: u64) -> Self {
        let id = format!("{}-{}", Self::prefix(), identifier);
        Self(id)
    }

    /// Returns the static prefix to be used across all channel identifiers.
    pub fn prefix() -> &'static str {
        CHANNEL_ID_PREFIX
    }

    /// Get this identifier as a borrowed `&str`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get this identifier as a borrowed byte slice
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn zero() -> Self {
        Self::new(0)
    }

    /// Reinterprets this identifier as the client identifier of a lite route.
    ///
    /// Identifiers of the `channel-{N}` form are reserved for classic channel
    /// ends and never resolve to a client.
    ///
    /// ```
    /// # use core::str::FromStr;
    /// # use ibc_relay_host_types::identifiers::ChannelId;
    /// let chan_id = ChannelId::from_str("9999-mock-0").unwrap();
    /// assert_eq!(chan_id.as_client_id().unwrap().as_str(), "9999-mock-0");
    /// assert!(ChannelId::new(3).as_client_id().is_err());
    /// ```
    pub fn as_client_id(&self) -> Result<ClientId, IdentifierError> {
        if self.is_indexed_channel() {
            return Err(IdentifierError::InvalidPrefix {
                prefix: CHANNEL_ID_PREFIX.to_string(),
            });
        }

        let client_id = ClientId::from_str(self.as_str())?;
        client_id.client_type()?;

        Ok(client_id)
    }

    /// Whether this is a `channel-{N}` identifier.
    fn is_indexed_channel(&self) -> bool {
        self.0
            .strip_prefix(CHANNEL_ID_PREFIX)
            .and_then(|rest| rest.strip_prefix('-'))
            .is_some_and(|counter| !counter.is_empty() && counter.bytes().all(|b| b.is_ascii_digit()))
    }
}

impl From<ClientId> for ChannelId {
    fn from(client_id: ClientId) -> Self {
        Self(client_id.into())
    }
}

/// This implementation provides a `to_string` method.
impl Display for ChannelId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChannelId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_packet_channel_identifier(s).map(|_| Self(s.to_string()))
    }
}

impl AsRef<str> for ChannelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Equality check against string literal (satisfies &ChannelId == &str).
/// ```
/// use core::str::FromStr;
/// use ibc_relay_host_types::identifiers::ChannelId;
/// let channel_id = ChannelId::from_str("channel-0");
/// assert!(channel_id.is_ok());
/// channel_id.map(|id| {assert_eq!(&id, "channel-0")});
/// ```
impl PartialEq<str> for ChannelId {
    fn eq(&self, other: &str) -> bool {
        self.as_str().eq(other)
    }
}
