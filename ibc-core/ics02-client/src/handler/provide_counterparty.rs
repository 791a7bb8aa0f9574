//! Protocol logic for `MsgProvideCounterparty`, which binds a local client
//! to the client tracking this chain on the other side of a lite route.

use ibc_relay_client_context::prelude::*;
use ibc_relay_client_types::error::ClientError;
use ibc_relay_client_types::events::ProvideCounterparty;
use ibc_relay_client_types::msgs::MsgProvideCounterparty;
use ibc_relay_handler_types::events::{IbcEvent, MessageEvent};
use ibc_relay_host::{ExecutionContext, ValidationContext};
use ibc_relay_primitives::prelude::*;

pub fn validate<Ctx, R>(
    ctx: &Ctx,
    clients: &R,
    msg: MsgProvideCounterparty,
) -> Result<(), ClientError>
where
    Ctx: ValidationContext,
    R: ClientRouter + ?Sized,
{
    ctx.validate_message_signer(&msg.signer)?;

    let client_id = msg.client_id;
    let module = clients.client_module(&client_id)?;

    if module
        .status(&ctx.client_store(&client_id)?, &client_id)
        .is_unknown()
    {
        return Err(ClientError::ClientNotFound { client_id });
    }

    msg.counterparty.validate()
}

/// Stores the binding, replacing any earlier one.
pub fn execute<Ctx>(ctx: &mut Ctx, msg: MsgProvideCounterparty) -> Result<(), ClientError>
where
    Ctx: ExecutionContext,
{
    let MsgProvideCounterparty {
        client_id,
        counterparty,
        signer: _,
    } = msg;

    let counterparty_client_id = counterparty.client_id.clone();
    ctx.store_client_counterparty(&client_id, counterparty)?;

    let event = IbcEvent::ProvideCounterparty(ProvideCounterparty::new(
        client_id.clone(),
        counterparty_client_id.clone(),
    ));
    ctx.emit_ibc_event(IbcEvent::Message(MessageEvent::Client))?;
    ctx.emit_ibc_event(event)?;
    ctx.log_message(format!(
        "success: client {client_id} bound to counterparty client {counterparty_client_id}"
    ))?;

    Ok(())
}
