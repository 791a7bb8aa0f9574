//! Protocol logic specific to processing ICS2 messages of type `MsgUpdateClient`.
//!
//! A client message may carry either a header or evidence of misbehaviour;
//! the light client module tells which once the message is verified.

use ibc_relay_client_context::prelude::*;
use ibc_relay_client_types::error::ClientError;
use ibc_relay_client_types::events::{ClientMisbehaviour, UpdateClient};
use ibc_relay_client_types::msgs::MsgUpdateClient;
use ibc_relay_handler_types::events::{IbcEvent, MessageEvent};
use ibc_relay_host::{ExecutionContext, ValidationContext};
use ibc_relay_primitives::prelude::*;

pub fn validate<Ctx, R>(ctx: &Ctx, clients: &R, msg: MsgUpdateClient) -> Result<(), ClientError>
where
    Ctx: ValidationContext,
    R: ClientRouter + ?Sized,
{
    ctx.validate_message_signer(&msg.signer)?;

    let client_id = msg.client_id;
    let module = clients.client_module(&client_id)?;
    let client_store = ctx.client_store(&client_id)?;

    module
        .status(&client_store, &client_id)
        .verify_is_active()?;

    module.verify_client_message(&client_store, &client_id, &msg.client_message)
}

pub fn execute<Ctx, R>(ctx: &mut Ctx, clients: &R, msg: MsgUpdateClient) -> Result<(), ClientError>
where
    Ctx: ExecutionContext,
    R: ClientRouter + ?Sized,
{
    let MsgUpdateClient {
        client_id,
        client_message,
        signer: _,
    } = msg;

    let module = clients.client_module(&client_id)?;

    let found_misbehaviour =
        module.check_for_misbehaviour(&ctx.client_store(&client_id)?, &client_id, &client_message)?;

    if found_misbehaviour {
        module.update_state_on_misbehaviour(
            &mut ctx.client_store_mut(&client_id)?,
            &client_id,
            &client_message,
        );

        let event = IbcEvent::ClientMisbehaviour(ClientMisbehaviour::new(
            client_id.clone(),
            module.client_type(),
        ));
        ctx.emit_ibc_event(IbcEvent::Message(MessageEvent::Client))?;
        ctx.emit_ibc_event(event)?;
        ctx.log_message(format!("client {client_id} frozen on misbehaviour"))?;

        return Ok(());
    }

    let consensus_heights =
        module.update_state(&mut ctx.client_store_mut(&client_id)?, &client_id, &client_message)?;

    if consensus_heights.is_empty() {
        ctx.log_message(format!(
            "duplicate update for client {client_id}: no new consensus state"
        ))?;
        return Ok(());
    }

    let event = IbcEvent::UpdateClient(UpdateClient::new(
        client_id.clone(),
        module.client_type(),
        consensus_heights,
    ));
    ctx.emit_ibc_event(IbcEvent::Message(MessageEvent::Client))?;
    ctx.emit_ibc_event(event)?;
    ctx.log_message(format!("success: client {client_id} updated"))?;

    Ok(())
}
