use ibc_relay_core::client::types::msgs::{MsgCreateClient, MsgUpdateClient};
use ibc_relay_core::client::types::Height;
use ibc_relay_core::host::types::identifiers::ClientId;
use ibc_relay_core::primitives::Timestamp;

use crate::fixtures::core::signer::dummy_account_id;
use crate::testapp::ibc::clients::mock::client_state::MockClientState;
use crate::testapp::ibc::clients::mock::consensus_state::MockConsensusState;
use crate::testapp::ibc::clients::mock::header::MockHeader;
use crate::testapp::ibc::clients::mock::misbehaviour::Misbehaviour;

/// A `MsgCreateClient` for a mock client trusting `header`.
pub fn dummy_msg_create_client(header: MockHeader) -> MsgCreateClient {
    MsgCreateClient::new(
        MockClientState::new(header).into(),
        MockConsensusState::new(header).into(),
        dummy_account_id(),
    )
}

/// A `MsgUpdateClient` carrying `header`.
pub fn dummy_msg_update_client(client_id: ClientId, header: MockHeader) -> MsgUpdateClient {
    MsgUpdateClient {
        client_id,
        client_message: header.into(),
        signer: dummy_account_id(),
    }
}

/// A `MsgUpdateClient` carrying two headers that disagree about `height`.
pub fn dummy_msg_misbehaviour(
    client_id: ClientId,
    height: Height,
    timestamp: Timestamp,
    conflicting_timestamp: Timestamp,
) -> MsgUpdateClient {
    let misbehaviour = Misbehaviour {
        client_id: client_id.clone(),
        header1: MockHeader::new(height, timestamp),
        header2: MockHeader::new(height, conflicting_timestamp),
    };

    MsgUpdateClient {
        client_id,
        client_message: misbehaviour.into(),
        signer: dummy_account_id(),
    }
}
