//! Protocol logic for processing `MsgTimeout`.

use ibc_relay_channel_types::channel::{Order, State};
use ibc_relay_channel_types::error::ChannelError;
use ibc_relay_channel_types::events::{ChannelClosed, TimeoutPacket};
use ibc_relay_channel_types::msgs::MsgTimeout;
use ibc_relay_channel_types::packet::Packet;
use ibc_relay_client::context::prelude::*;
use ibc_relay_client::types::Height;
use ibc_relay_commitment_types::commitment::CommitmentProofBytes;
use ibc_relay_handler_types::events::IbcEvent;
use ibc_relay_host::types::identifiers::Sequence;
use ibc_relay_host::types::path::{ChannelEndPath, CommitmentPath, ReceiptPath, SeqRecvPath};
use ibc_relay_host::{ExecutionContext, ValidationContext};
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::Signer;
use ibc_relay_router::module::Module;

use super::acknowledgement::verify_commitment_matches;
use super::{
    emit_channel_event, emit_module_extras, packet_route, verify_packet_proof, PacketProof,
    PacketRoute,
};

pub fn timeout_packet<Ctx, R>(
    ctx_a: &mut Ctx,
    clients: &R,
    module: &mut dyn Module,
    msg: MsgTimeout,
) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
    R: ClientRouter + ?Sized,
{
    timeout_packet_validate(ctx_a, clients, &*module, &msg)?;
    timeout_packet_execute(ctx_a, module, msg)
}

/// Validate that timing out the packet would succeed.
///
/// The channel may be closed. The timeout must have elapsed at the proof height by the consensus
/// timestamp the source chain stores for that height, and the proof must
/// show the packet was never received.
pub fn timeout_packet_validate<Ctx, R>(
    ctx_a: &Ctx,
    clients: &R,
    module: &dyn Module,
    msg: &MsgTimeout,
) -> Result<(), ChannelError>
where
    Ctx: ValidationContext,
    R: ClientRouter + ?Sized,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    let packet = &msg.packet;
    let route = packet_route(ctx_a, &packet.port_id_on_a, &packet.chan_id_on_a)?;

    // An ordered channel is already closed by the timeout that settled an
    // earlier packet, so only the commitment decides the no-op.
    route.verify_counterparty_matches(&packet.port_id_on_b, &packet.chan_id_on_b)?;

    verify_commitment_matches(ctx_a, packet)?;

    // check that timeout height or timeout timestamp has passed on the other end
    {
        let client_id_on_a = route.client_id();
        let client_module = clients.client_module(client_id_on_a)?;
        let client_store = ctx_a.client_store(client_id_on_a)?;

        client_module
            .status(&client_store, client_id_on_a)
            .verify_is_active()?;

        let timestamp_on_b = client_module.timestamp_at_height(
            &client_store,
            client_id_on_a,
            &msg.proof_height_on_b,
        )?;

        if !packet.timed_out(&timestamp_on_b, msg.proof_height_on_b) {
            return Err(ChannelError::TimeoutNotReached {
                timeout: packet.timeout(),
                height: msg.proof_height_on_b,
                timestamp: timestamp_on_b,
            });
        }
    }

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

/// A prior call to [`timeout_packet_validate`] MUST have succeeded.
pub fn timeout_packet_execute<Ctx>(
    ctx_a: &mut Ctx,
    module: &mut dyn Module,
    msg: MsgTimeout,
) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    settle_timed_out(ctx_a, module, msg.packet, msg.signer)
}

/// Proves that the destination never received the packet.
///
/// Unordered routes prove the receipt is absent. Ordered channels prove the
/// destination's `nextSequenceRecv`, which must not have passed the packet.
pub(crate) fn verify_unreceived<Ctx, R>(
    ctx_a: &Ctx,
    clients: &R,
    route: &PacketRoute,
    packet: &Packet,
    next_seq_recv_on_b: Sequence,
    proof_unreceived_on_b: &CommitmentProofBytes,
    proof_height_on_b: &Height,
) -> Result<(), ChannelError>
where
    Ctx: ValidationContext,
    R: ClientRouter + ?Sized,
{
    let proof = PacketProof {
        sequence: packet.seq_on_a,
        height: proof_height_on_b,
        proof: proof_unreceived_on_b,
    };

    match route.ordering() {
        Order::Ordered => {
            if packet.seq_on_a < next_seq_recv_on_b {
                return Err(ChannelError::InvalidPacketSequence {
                    expected: next_seq_recv_on_b,
                    actual: packet.seq_on_a,
                });
            }

            let seq_recv_path_on_b = SeqRecvPath::new(&packet.port_id_on_b, &packet.chan_id_on_b);

            verify_packet_proof(
                ctx_a,
                clients,
                route,
                proof,
                seq_recv_path_on_b.into(),
                Some(next_seq_recv_on_b.to_vec()),
            )
        }
        Order::Unordered => {
            let receipt_path_on_b =
                ReceiptPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);

            verify_packet_proof(ctx_a, clients, route, proof, receipt_path_on_b.into(), None)
        }
    }
}

/// Deletes the commitment of a timed out packet and notifies the
/// application. An ordered channel is closed, since its sequence can no
/// longer advance.
pub(crate) fn settle_timed_out<Ctx>(
    ctx_a: &mut Ctx,
    module: &mut dyn Module,
    packet: Packet,
    signer: Signer,
) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    let route = packet_route(ctx_a, &packet.port_id_on_a, &packet.chan_id_on_a)?;

    let commitment_path_on_a =
        CommitmentPath::new(&packet.port_id_on_a, &packet.chan_id_on_a, packet.seq_on_a);

    // check if we're in the NO-OP case
    if ctx_a.get_packet_commitment(&commitment_path_on_a)?.is_none() {
        return Err(ChannelError::no_op(format!(
            "packet {} already acknowledged or timed out",
            packet.seq_on_a
        )));
    }

    ctx_a.delete_packet_commitment(&commitment_path_on_a)?;

    let event = IbcEvent::TimeoutPacket(TimeoutPacket::new(packet.clone(), route.ordering()));
    emit_channel_event(ctx_a, event)?;

    if let PacketRoute::Classic(mut chan_end_on_a) = route {
        if chan_end_on_a.ordering == Order::Ordered {
            chan_end_on_a.set_state(State::Closed);
            ctx_a.store_channel(
                &ChannelEndPath::new(&packet.port_id_on_a, &packet.chan_id_on_a),
                chan_end_on_a,
            )?;

            ctx_a.log_message(format!(
                "channel {}/{} closed on timeout of packet {}",
                packet.port_id_on_a, packet.chan_id_on_a, packet.seq_on_a
            ))?;

            let event = IbcEvent::ChannelClosed(ChannelClosed::new(
                packet.port_id_on_a.clone(),
                packet.chan_id_on_a.clone(),
                packet.port_id_on_b.clone(),
                packet.chan_id_on_b.clone(),
                Order::Ordered,
            ));
            emit_channel_event(ctx_a, event)?;
        }
    }

    let (extras, cb_result) = module.on_timeout_packet_execute(ctx_a.store_mut(), &packet, &signer);

    cb_result?;

    // emit events and logs
    {
        ctx_a.log_message("success: packet timeout".to_string())?;
        emit_module_extras(ctx_a, extras)?;
    }

    Ok(())
}
