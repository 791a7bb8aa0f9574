//! Protocol logic for writing the acknowledgement of a received packet.

use ibc_relay_channel_types::acknowledgement::Acknowledgement;
use ibc_relay_channel_types::commitment::compute_ack_commitment;
use ibc_relay_channel_types::error::ChannelError;
use ibc_relay_channel_types::events::WriteAcknowledgement;
use ibc_relay_channel_types::packet::Packet;
use ibc_relay_handler_types::events::IbcEvent;
use ibc_relay_host::types::path::AckPath;
use ibc_relay_host::{ExecutionContext, ValidationContext};
use ibc_relay_primitives::prelude::*;

use super::{emit_channel_event, packet_route};

/// Writes the acknowledgement of `packet` on the receiving chain.
///
/// Receive calls this for synchronous acknowledgements; applications call it
/// themselves once an asynchronous acknowledgement is ready.
pub fn write_acknowledgement<Ctx>(
    ctx_b: &mut Ctx,
    packet: &Packet,
    acknowledgement: Acknowledgement,
) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    write_acknowledgement_validate(ctx_b, packet, &acknowledgement)?;
    write_acknowledgement_execute(ctx_b, packet, acknowledgement)
}

pub fn write_acknowledgement_validate<Ctx>(
    ctx_b: &Ctx,
    packet: &Packet,
    acknowledgement: &Acknowledgement,
) -> Result<(), ChannelError>
where
    Ctx: ValidationContext,
{
    packet_route(ctx_b, &packet.port_id_on_b, &packet.chan_id_on_b)?;

    if acknowledgement.as_bytes().is_empty() {
        return Err(ChannelError::EmptyAcknowledgement);
    }

    let ack_path_on_b = AckPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);
    if ctx_b.get_packet_acknowledgement(&ack_path_on_b)?.is_some() {
        return Err(ChannelError::AcknowledgementExists {
            sequence: packet.seq_on_a,
        });
    }

    Ok(())
}

/// A prior call to [`write_acknowledgement_validate`] MUST have succeeded.
pub fn write_acknowledgement_execute<Ctx>(
    ctx_b: &mut Ctx,
    packet: &Packet,
    acknowledgement: Acknowledgement,
) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    let ack_path_on_b = AckPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);

    ctx_b.store_packet_acknowledgement(&ack_path_on_b, compute_ack_commitment(&acknowledgement))?;

    ctx_b.log_message(format!(
        "success: packet write acknowledgement: sequence: {}",
        packet.seq_on_a
    ))?;

    let event = IbcEvent::WriteAcknowledgement(WriteAcknowledgement::new(
        packet.clone(),
        acknowledgement,
    ));
    emit_channel_event(ctx_b, event)
}
