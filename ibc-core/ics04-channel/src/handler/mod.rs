//! This module implements the processing logic for ICS4 (packet semantics)
//! messages.
//!
//! Every packet is routed by its local end: a stored [`ChannelEnd`] selects
//! the classic route, otherwise a lite counterparty binding stored for the
//! channel identifier read as a client identifier selects the lite route.

mod acknowledgement;
mod recv_packet;
mod send_packet;
mod timeout;
mod timeout_on_close;
mod write_acknowledgement;

use core::time::Duration;

pub use acknowledgement::*;
use ibc_relay_channel_types::channel::{ChannelEnd, Order, State};
use ibc_relay_channel_types::error::ChannelError;
use ibc_relay_client::context::prelude::*;
use ibc_relay_client::types::{Counterparty, Height};
use ibc_relay_commitment_types::commitment::CommitmentProofBytes;
use ibc_relay_commitment_types::merkle::{apply_prefix, build_merkle_path, MerklePath};
use ibc_relay_handler_types::events::{IbcEvent, MessageEvent};
use ibc_relay_host::types::identifiers::{ChannelId, ClientId, PortId, Sequence};
use ibc_relay_host::types::path::{ChannelEndPath, Path};
use ibc_relay_host::{ExecutionContext, ValidationContext};
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::ZERO_DURATION;
use ibc_relay_router::types::module::ModuleExtras;
pub use recv_packet::*;
pub use send_packet::*;
pub use timeout::*;
pub use timeout_on_close::*;
pub use write_acknowledgement::*;

/// How the packets of a local (port, channel) are settled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PacketRoute {
    /// A provisioned channel end.
    Classic(ChannelEnd),
    /// The counterparty binding of the local client named by the channel.
    Lite {
        client_id: ClientId,
        counterparty: Counterparty,
    },
}

/// Selects the route of the local end `(port_id, channel_id)`.
pub fn packet_route<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> Result<PacketRoute, ChannelError>
where
    Ctx: ValidationContext,
{
    if let Some(chan_end) = ctx.channel_end(&ChannelEndPath::new(port_id, channel_id))? {
        return Ok(PacketRoute::Classic(chan_end));
    }

    let missing_channel = || ChannelError::MissingChannel {
        port_id: port_id.clone(),
        channel_id: channel_id.clone(),
    };

    let Ok(client_id) = channel_id.as_client_id() else {
        return Err(missing_channel());
    };

    match ctx.client_counterparty(&client_id)? {
        Some(counterparty) => Ok(PacketRoute::Lite {
            client_id,
            counterparty,
        }),
        None => Err(missing_channel()),
    }
}

impl PacketRoute {
    /// Lite routes carry no ordering and behave as unordered channels.
    pub fn ordering(&self) -> Order {
        match self {
            Self::Classic(chan_end) => chan_end.ordering,
            Self::Lite { .. } => Order::Unordered,
        }
    }

    /// The local client tracking the counterparty chain.
    pub fn client_id(&self) -> &ClientId {
        match self {
            Self::Classic(chan_end) => &chan_end.client_id,
            Self::Lite { client_id, .. } => client_id,
        }
    }

    /// Classic channel ends must be open to send or receive packets.
    pub fn verify_open(&self) -> Result<(), ChannelError> {
        match self {
            Self::Classic(chan_end) => chan_end.verify_state_matches(&State::Open),
            Self::Lite { .. } => Ok(()),
        }
    }

    /// Checks that `(port_id, channel_id)` names the remote end bound to
    /// this route. A lite route only binds the remote client.
    pub fn verify_counterparty_matches(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(), ChannelError> {
        match self {
            Self::Classic(chan_end) => chan_end.verify_counterparty_matches(port_id, channel_id),
            Self::Lite { counterparty, .. } => {
                if channel_id.as_str() != counterparty.client_id.as_str() {
                    return Err(ChannelError::MismatchedCounterparty {
                        expected: counterparty.client_id.to_string(),
                        actual: channel_id.to_string(),
                    });
                }
                Ok(())
            }
        }
    }

    /// Builds the proof key of `path` under the counterparty's store.
    pub fn merkle_path(&self, path: Path) -> Result<MerklePath, ChannelError> {
        match self {
            Self::Classic(chan_end) => Ok(apply_prefix(
                &chan_end.counterparty_prefix,
                MerklePath::new(vec![path.to_string()]),
            )?),
            Self::Lite { counterparty, .. } => Ok(build_merkle_path(
                &counterparty.merkle_path_prefix,
                &path.to_string(),
            )),
        }
    }

    /// The time and block delays a proof must have aged by.
    fn proof_delay<Ctx: ValidationContext>(&self, ctx: &Ctx) -> (Duration, u64) {
        match self {
            Self::Classic(chan_end) => (
                chan_end.delay_period,
                ctx.block_delay(&chan_end.delay_period),
            ),
            Self::Lite { .. } => (ZERO_DURATION, 0),
        }
    }
}

/// Proof material of a packet message.
pub(crate) struct PacketProof<'a> {
    pub sequence: Sequence,
    pub height: &'a Height,
    pub proof: &'a CommitmentProofBytes,
}

/// Checks the route's client is active and verifies `value` (or its absence
/// when `None`) at `path` on the counterparty.
pub(crate) fn verify_packet_proof<Ctx, R>(
    ctx: &Ctx,
    clients: &R,
    route: &PacketRoute,
    proof: PacketProof<'_>,
    path: Path,
    value: Option<Vec<u8>>,
) -> Result<(), ChannelError>
where
    Ctx: ValidationContext,
    R: ClientRouter + ?Sized,
{
    let client_id = route.client_id();
    let module = clients.client_module(client_id)?;
    let client_store = ctx.client_store(client_id)?;

    module
        .status(&client_store, client_id)
        .verify_is_active()?;

    let merkle_path = route.merkle_path(path)?;
    let (delay_time_period, delay_block_period) = route.proof_delay(ctx);

    let verification = match value {
        Some(value) => module.verify_membership(
            &client_store,
            client_id,
            proof.height,
            delay_time_period,
            delay_block_period,
            proof.proof,
            &merkle_path,
            &value,
        ),
        None => module.verify_non_membership(
            &client_store,
            client_id,
            proof.height,
            delay_time_period,
            delay_block_period,
            proof.proof,
            &merkle_path,
        ),
    };

    verification.map_err(|e| ChannelError::FailedPacketVerification {
        sequence: proof.sequence,
        client_error: e,
    })
}

/// Forwards the events and logs of an application callback to the host.
pub(crate) fn emit_module_extras<Ctx>(ctx: &mut Ctx, extras: ModuleExtras) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    for module_event in extras.events {
        ctx.emit_ibc_event(IbcEvent::Module(module_event))?;
    }

    for log_message in extras.log {
        ctx.log_message(log_message)?;
    }

    Ok(())
}

/// Emits the channel message event followed by `event`.
pub(crate) fn emit_channel_event<Ctx>(ctx: &mut Ctx, event: IbcEvent) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    ctx.emit_ibc_event(IbcEvent::Message(MessageEvent::Channel))?;
    ctx.emit_ibc_event(event)?;
    Ok(())
}
