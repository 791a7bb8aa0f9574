//! Protocol logic for processing `MsgTimeoutOnClose`: a packet is timed out
//! because the destination closed its end of the channel, whether or not
//! the packet's own timeout has elapsed.

use ibc_relay_channel_types::channel::{ChannelEnd, Counterparty, State};
use ibc_relay_channel_types::error::ChannelError;
use ibc_relay_channel_types::msgs::MsgTimeoutOnClose;
use ibc_relay_client::context::prelude::*;
use ibc_relay_host::types::path::ChannelEndPath;
use ibc_relay_host::{ExecutionContext, ValidationContext};
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::proto::Protobuf;
use ibc_relay_router::module::Module;

use super::acknowledgement::verify_commitment_matches;
use super::timeout::{settle_timed_out, verify_unreceived};
use super::{packet_route, verify_packet_proof, PacketProof, PacketRoute};

pub fn timeout_on_close_packet<Ctx, R>(
    ctx_a: &mut Ctx,
    clients: &R,
    module: &mut dyn Module,
    msg: MsgTimeoutOnClose,
) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
    R: ClientRouter + ?Sized,
{
    timeout_on_close_packet_validate(ctx_a, clients, &*module, &msg)?;
    timeout_on_close_packet_execute(ctx_a, module, msg)
}

/// Only classic channels can be closed; lite routes reject the message.
pub fn timeout_on_close_packet_validate<Ctx, R>(
    ctx_a: &Ctx,
    clients: &R,
    module: &dyn Module,
    msg: &MsgTimeoutOnClose,
) -> Result<(), ChannelError>
where
    Ctx: ValidationContext,
    R: ClientRouter + ?Sized,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    let packet = &msg.packet;
    let route = packet_route(ctx_a, &packet.port_id_on_a, &packet.chan_id_on_a)?;

    let PacketRoute::Classic(chan_end_on_a) = &route else {
        return Err(ChannelError::InvalidPacket {
            description: format!(
                "packet {} travels a lite route, which has no channel to close",
                packet.seq_on_a
            ),
        });
    };

    route.verify_counterparty_matches(&packet.port_id_on_b, &packet.chan_id_on_b)?;

    verify_commitment_matches(ctx_a, packet)?;

    // the counterparty channel end, as the destination stores it once closed
    let expected_chan_end_on_b = ChannelEnd::new(
        State::Closed,
        chan_end_on_a.ordering,
        Counterparty::new(
            packet.port_id_on_a.clone(),
            packet.chan_id_on_a.clone(),
            chan_end_on_a.client_id.clone(),
        ),
        chan_end_on_a.remote.client_id.clone(),
        ctx_a.commitment_prefix(),
        chan_end_on_a.delay_period,
        chan_end_on_a.version.clone(),
    );

    verify_packet_proof(
        ctx_a,
        clients,
        &route,
        PacketProof {
            sequence: packet.seq_on_a,
            height: &msg.proof_height_on_b,
            proof: &msg.proof_close_on_b,
        },
        ChannelEndPath::new(&packet.port_id_on_b, &packet.chan_id_on_b).into(),
        Some(expected_chan_end_on_b.encode_vec()),
    )?;

    verify_unreceived(
        ctx_a,
        clients,
        &route,
        packet,
        msg.next_seq_recv_on_b,
        &msg.proof_unreceived_on_b,
        &msg.proof_height_on_b,
    )?;

    module.on_timeout_packet_validate(packet, &msg.signer)
}

/// A prior call to [`timeout_on_close_packet_validate`] MUST have succeeded.
pub fn timeout_on_close_packet_execute<Ctx>(
    ctx_a: &mut Ctx,
    module: &mut dyn Module,
    msg: MsgTimeoutOnClose,
) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    settle_timed_out(ctx_a, module, msg.packet, msg.signer)
}
