use core::str::FromStr;

use derive_more::Into;
use ibc_relay_primitives::prelude::*;

use super::ClientType;
use crate::error::IdentifierError;
use crate::validate::{validate_client_identifier, validate_client_type};

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
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Into, derive_more::Display)]
pub struct ClientId(String);

impl ClientId {
    /// Builds a new client identifier.
    ///
    /// Client identifiers are deterministically formed from two elements:
    /// a prefix derived from the client type `ctype`, and a monotonically
    /// increasing `counter`; these are separated by a dash "-".
    ///
    /// See also [`ClientType::build_client_id`](super::ClientType::build_client_id)
    /// method.
    ///
    /// # Example
    ///
    /// ```
    /// # use ibc_relay_host_types::identifiers::ClientId;
    /// let client_id = ClientId::new("07-tendermint", 0).unwrap();
    /// assert_eq!(client_id.as_str(), "07-tendermint-0");
    /// ```
    pub fn new(client_type: &str, counter: u64) -> Result<Self, IdentifierError> {
        let client_type = client_type.trim();
        validate_client_type(client_type).map(|()| Self::format(client_type, counter))
    }

    pub(super) fn format(client_type: &str, counter: u64) -> Self {
        Self(format!("{client_type}-{counter}"))
    }

    /// Get this identifier as a borrowed `&str`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get this identifier as a borrowed byte slice
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Returns the client type this identifier was built from: everything
    /// before the last dash.
    ///
    /// ```
    /// # use core::str::FromStr;
    /// # use ibc_relay_host_types::identifiers::ClientId;
    /// let client_id = ClientId::from_str("07-tendermint-14").unwrap();
    /// assert_eq!(client_id.client_type().unwrap().as_str(), "07-tendermint");
    /// ```
    pub fn client_type(&self) -> Result<ClientType, IdentifierError> {
        let (client_type, _) =
            self.0
                .rsplit_once('-')
                .ok_or_else(|| IdentifierError::MissingClientType {
                    id: self.0.clone(),
                })?;

        ClientType::new(client_type)
    }
}

impl FromStr for ClientId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_client_identifier(s).map(|_| Self(s.to_string()))
    }
}

/// Equality check against string literal (satisfies &ClientId == &str).
/// ```
/// use core::str::FromStr;
/// use ibc_relay_host_types::identifiers::ClientId;
/// let client_id = ClientId::from_str("clientidtwo");
/// assert!(client_id.is_ok());
/// client_id.map(|id| {assert_eq!(&id, "clientidtwo")});
/// ```
impl PartialEq<str> for ClientId {
    fn eq(&self, other: &str) -> bool {
        self.as_str().eq(other)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("9999-mock-0", Some("9999-mock"))]
    #[case("07-tendermint-18446744073709551615", Some("07-tendermint"))]
    #[case("clientidtwo", None)]
    #[case("a-clientid", None)]
    fn client_type_is_prefix_before_last_dash(
        #[case] client_id: &str,
        #[case] expected: Option<&str>,
    ) {
        let client_id = ClientId::from_str(client_id).expect("valid client id");
        let client_type = client_id.client_type().ok();

        assert_eq!(client_type.as_ref().map(ClientType::as_str), expected);
    }

    #[test]
    fn new_rejects_invalid_client_type() {
        assert!(ClientId::new("bad/type", 0).is_err());
        assert!(ClientId::new("short", 0).is_err());
    }
}
