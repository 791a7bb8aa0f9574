//! Admission filter rejecting relay transactions whose packet messages are
//! all redundant.
//!
//! Several relayers usually race to deliver the same packets, and the losers
//! pay fees for transactions that change nothing. During check-time
//! admission a transaction is rejected when every packet message in it has
//! already been settled. Final execution never runs the filter: each message
//! is validated on its own there, and redundant ones are no-ops.

use ibc_relay_channel::handler::{
    acknowledgement_packet_validate, record_packet_receipt, recv_packet_validate,
    timeout_on_close_packet_validate, timeout_packet_validate,
};
use ibc_relay_channel::types::error::ChannelError;
use ibc_relay_channel::types::msgs::{packet_msg_to_port_id, PacketMsg};
use ibc_relay_channel::types::packet::Packet;
use ibc_relay_client::context::prelude::*;
use ibc_relay_client::handler::update_client;
use ibc_relay_client::types::msgs::ClientMsg;
use ibc_relay_handler_types::error::HandlerError;
use ibc_relay_handler_types::msgs::MsgEnvelope;
use ibc_relay_host::types::path::CommitmentPath;
use ibc_relay_host::{CachedContext, ExecutionContext, ValidationContext};
use ibc_relay_router::router::Router;

use crate::entrypoint::route_module;

/// Checks a prospective transaction for redundancy.
///
/// Only active when `is_check_tx` is set and the transaction is not being
/// simulated. Any message other than a packet message or a client update
/// admits the whole transaction. Otherwise packet messages are validated in
/// order against a scratch copy of the state, client updates are applied to
/// it without being counted, and the transaction is rejected with
/// [`HandlerError::RedundantTransaction`] iff every packet message is a
/// no-op. Errors other than the no-op reject the transaction with that
/// error.
pub fn check_redundancy<Ctx, C, R>(
    ctx: &Ctx,
    clients: &C,
    router: &R,
    msgs: &[MsgEnvelope],
    is_check_tx: bool,
    simulate: bool,
) -> Result<(), HandlerError>
where
    Ctx: ValidationContext,
    C: ClientRouter + ?Sized,
    R: Router + ?Sized,
{
    if !is_check_tx || simulate {
        return Ok(());
    }

    if msgs.iter().any(|msg| !is_screened(msg)) {
        return Ok(());
    }

    let mut check_ctx = CachedContext::new(ctx);
    let mut packet_msgs: u64 = 0;
    let mut redundant: u64 = 0;

    for msg in msgs {
        let outcome = match msg {
            MsgEnvelope::Client(ClientMsg::UpdateClient(msg)) => {
                update_client::validate(&check_ctx, clients, msg.clone())?;
                update_client::execute(&mut check_ctx, clients, msg.clone())?;
                continue;
            }
            MsgEnvelope::Packet(PacketMsg::Recv(msg)) => {
                recv_packet_validate(&check_ctx, clients, msg)
                    .and_then(|()| record_packet_receipt(&mut check_ctx, &msg.packet))
            }
            MsgEnvelope::Packet(msg @ PacketMsg::Ack(ack)) => {
                let module = route_module(router, packet_msg_to_port_id(msg))?;
                acknowledgement_packet_validate(&check_ctx, clients, module, ack)
                    .and_then(|()| settle_commitment(&mut check_ctx, &ack.packet))
            }
            MsgEnvelope::Packet(msg @ PacketMsg::Timeout(timeout)) => {
                let module = route_module(router, packet_msg_to_port_id(msg))?;
                timeout_packet_validate(&check_ctx, clients, module, timeout)
                    .and_then(|()| settle_commitment(&mut check_ctx, &timeout.packet))
            }
            MsgEnvelope::Packet(msg @ PacketMsg::TimeoutOnClose(timeout)) => {
                let module = route_module(router, packet_msg_to_port_id(msg))?;
                timeout_on_close_packet_validate(&check_ctx, clients, module, timeout)
                    .and_then(|()| settle_commitment(&mut check_ctx, &timeout.packet))
            }
            _ => continue,
        };

        packet_msgs += 1;

        match outcome {
            Ok(()) => {}
            Err(e) if e.is_no_op() => redundant += 1,
            Err(e) => return Err(e.into()),
        }
    }

    if packet_msgs > 0 && redundant == packet_msgs {
        return Err(HandlerError::RedundantTransaction { total: packet_msgs });
    }

    Ok(())
}

/// Packet messages that may be redundant, and client updates, which
/// usually accompany them.
fn is_screened(msg: &MsgEnvelope) -> bool {
    matches!(
        msg,
        MsgEnvelope::Client(ClientMsg::UpdateClient(_))
            | MsgEnvelope::Packet(
                PacketMsg::Recv(_)
                    | PacketMsg::Ack(_)
                    | PacketMsg::Timeout(_)
                    | PacketMsg::TimeoutOnClose(_)
            )
    )
}

/// Drops the commitment of a packet settled earlier in the transaction, so
/// a duplicate later in the same transaction reads as redundant.
fn settle_commitment<Ctx>(check_ctx: &mut Ctx, packet: &Packet) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    let commitment_path_on_a =
        CommitmentPath::new(&packet.port_id_on_a, &packet.chan_id_on_a, packet.seq_on_a);

    Ok(check_ctx.delete_packet_commitment(&commitment_path_on_a)?)
}
