use ibc_relay_core::primitives::prelude::*;
use ibc_relay_core::primitives::Signer;

/// An arbitrary bech32 account, accepted by every mock context.
pub fn dummy_account_id() -> Signer {
    "cosmos1wxeyh7zgn4tctjzs0vtqpc6p5cxq5t2muzl7ng".to_string().into()
}
