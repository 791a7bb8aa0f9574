//! Protocol logic specific to processing ICS2 messages of type `MsgCreateClient`.

use ibc_relay_client_context::prelude::*;
use ibc_relay_client_types::error::ClientError;
use ibc_relay_client_types::events::CreateClient;
use ibc_relay_client_types::msgs::MsgCreateClient;
use ibc_relay_client_types::Status;
use ibc_relay_handler_types::events::{IbcEvent, MessageEvent};
use ibc_relay_host::{CacheStore, ClientStoreMut, ExecutionContext, ValidationContext};
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::proto::Any;

fn route<'r, R>(clients: &'r R, client_state: &Any) -> Result<&'r dyn LightClientModule, ClientError>
where
    R: ClientRouter + ?Sized,
{
    clients
        .client_module_for_state(client_state)
        .ok_or_else(|| ClientError::InvalidClientState {
            description: format!(
                "no light client module decodes client states of type `{}`",
                client_state.type_url
            ),
        })
}

pub fn validate<Ctx, R>(ctx: &Ctx, clients: &R, msg: MsgCreateClient) -> Result<(), ClientError>
where
    Ctx: ValidationContext,
    R: ClientRouter + ?Sized,
{
    let MsgCreateClient {
        client_state,
        consensus_state,
        signer,
    } = msg;

    ctx.validate_message_signer(&signer)?;

    let module = route(clients, &client_state)?;
    let client_type = module.client_type();

    if !ctx.client_params().is_allowed(&client_type) {
        return Err(ClientError::ClientTypeNotAllowed { client_type });
    }

    // Construct this client's identifier
    let client_id = client_type.build_client_id(ctx.client_counter()?);

    if module.status(&ctx.client_store(&client_id)?, &client_id) != Status::Unknown {
        return Err(ClientError::ClientAlreadyExists { client_id });
    }

    // Initialising against a throwaway overlay validates both states without
    // touching the host store.
    let mut scratch = CacheStore::new(ctx.store());
    let mut client_store = ClientStoreMut::new(
        &mut scratch,
        &client_id,
        ctx.host_height()?,
        ctx.host_timestamp()?,
    );
    module.initialise(&mut client_store, &client_id, client_state, consensus_state)
}

pub fn execute<Ctx, R>(ctx: &mut Ctx, clients: &R, msg: MsgCreateClient) -> Result<(), ClientError>
where
    Ctx: ExecutionContext,
    R: ClientRouter + ?Sized,
{
    let MsgCreateClient {
        client_state,
        consensus_state,
        signer: _,
    } = msg;

    let module = route(clients, &client_state)?;
    let client_type = module.client_type();

    // Construct this client's identifier
    let client_id = client_type.build_client_id(ctx.client_counter()?);

    module.initialise(
        &mut ctx.client_store_mut(&client_id)?,
        &client_id,
        client_state,
        consensus_state,
    )?;

    let latest_height = module.latest_height(&ctx.client_store(&client_id)?, &client_id)?;

    ctx.increase_client_counter()?;

    let event = IbcEvent::CreateClient(CreateClient::new(
        client_id.clone(),
        client_type,
        latest_height,
    ));
    ctx.emit_ibc_event(IbcEvent::Message(MessageEvent::Client))?;
    ctx.emit_ibc_event(event)?;

    ctx.log_message(format!(
        "success: generated new client identifier: {client_id}"
    ))?;

    Ok(())
}
