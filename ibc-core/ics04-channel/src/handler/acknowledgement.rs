//! Protocol logic for processing `MsgAcknowledgement`.

use ibc_relay_channel_types::channel::Order;
use ibc_relay_channel_types::commitment::compute_ack_commitment;
use ibc_relay_channel_types::error::ChannelError;
use ibc_relay_channel_types::events::AcknowledgePacket;
use ibc_relay_channel_types::msgs::MsgAcknowledgement;
use ibc_relay_channel_types::packet::Packet;
use ibc_relay_client::context::prelude::*;
use ibc_relay_handler_types::events::IbcEvent;
use ibc_relay_host::types::path::{AckPath, CommitmentPath, SeqAckPath};
use ibc_relay_host::{ExecutionContext, ValidationContext};
use ibc_relay_primitives::prelude::*;
use ibc_relay_router::module::Module;

use super::{
    emit_channel_event, emit_module_extras, packet_route, verify_packet_proof, PacketProof,
};

pub fn acknowledgement_packet<Ctx, R>(
    ctx_a: &mut Ctx,
    clients: &R,
    module: &mut dyn Module,
    msg: MsgAcknowledgement,
) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
    R: ClientRouter + ?Sized,
{
    acknowledgement_packet_validate(ctx_a, clients, &*module, &msg)?;
    acknowledgement_packet_execute(ctx_a, module, msg)
}

pub fn acknowledgement_packet_validate<Ctx, R>(
    ctx_a: &Ctx,
    clients: &R,
    module: &dyn Module,
    msg: &MsgAcknowledgement,
) -> Result<(), ChannelError>
where
    Ctx: ValidationContext,
    R: ClientRouter + ?Sized,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    let packet = &msg.packet;
    let route = packet_route(ctx_a, &packet.port_id_on_a, &packet.chan_id_on_a)?;

    route.verify_open()?;
    route.verify_counterparty_matches(&packet.port_id_on_b, &packet.chan_id_on_b)?;

    verify_commitment_matches(ctx_a, packet)?;

    if let Order::Ordered = route.ordering() {
        let seq_ack_path_on_a = SeqAckPath::new(&packet.port_id_on_a, &packet.chan_id_on_a);
        let next_seq_ack = ctx_a.get_next_sequence_ack(&seq_ack_path_on_a)?;

        if packet.seq_on_a != next_seq_ack {
            return Err(ChannelError::InvalidPacketSequence {
                expected: next_seq_ack,
                actual: packet.seq_on_a,
            });
        }
    }

    let ack_path_on_b = AckPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);

    verify_packet_proof(
        ctx_a,
        clients,
        &route,
        PacketProof {
            sequence: packet.seq_on_a,
            height: &msg.proof_height_on_b,
            proof: &msg.proof_acked_on_b,
        },
        ack_path_on_b.into(),
        Some(compute_ack_commitment(&msg.acknowledgement).into_vec()),
    )?;

    module.on_acknowledgement_packet_validate(packet, &msg.acknowledgement, &msg.signer)
}

/// Settle the packet: its commitment is deleted and the application is
/// handed the acknowledgement.
///
/// A prior call to [`acknowledgement_packet_validate`] MUST have succeeded.
pub fn acknowledgement_packet_execute<Ctx>(
    ctx_a: &mut Ctx,
    module: &mut dyn Module,
    msg: MsgAcknowledgement,
) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    let MsgAcknowledgement {
        packet,
        acknowledgement,
        signer,
        ..
    } = msg;

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

    if let Order::Ordered = route.ordering() {
        let seq_ack_path_on_a = SeqAckPath::new(&packet.port_id_on_a, &packet.chan_id_on_a);
        ctx_a.store_next_sequence_ack(&seq_ack_path_on_a, packet.seq_on_a.increment())?;
    }

    let event = IbcEvent::AcknowledgePacket(AcknowledgePacket::new(packet.clone(), route.ordering()));
    emit_channel_event(ctx_a, event)?;

    let (extras, cb_result) =
        module.on_acknowledgement_packet_execute(ctx_a.store_mut(), &packet, &acknowledgement, &signer);

    cb_result?;

    // emit events and logs
    {
        ctx_a.log_message("success: packet acknowledgement".to_string())?;
        emit_module_extras(ctx_a, extras)?;
    }

    Ok(())
}

/// Checks the packet is still outstanding and is the one that was sent.
///
/// An absent commitment is the no-op: the packet was already settled, or
/// never sent. A commitment that differs from the packet's is a hard error.
pub(crate) fn verify_commitment_matches<Ctx>(
    ctx_a: &Ctx,
    packet: &Packet,
) -> Result<(), ChannelError>
where
    Ctx: ValidationContext,
{
    let commitment_path_on_a =
        CommitmentPath::new(&packet.port_id_on_a, &packet.chan_id_on_a, packet.seq_on_a);

    let Some(commitment_on_a) = ctx_a.get_packet_commitment(&commitment_path_on_a)? else {
        return Err(ChannelError::no_op(format!(
            "no commitment for packet {}",
            packet.seq_on_a
        )));
    };

    if commitment_on_a != packet.commitment() {
        return Err(ChannelError::MismatchedPacketCommitment {
            sequence: packet.seq_on_a,
        });
    }

    Ok(())
}
