use ibc_relay_channel::handler::{
    acknowledgement_packet_execute, acknowledgement_packet_validate, recv_packet_execute,
    recv_packet_validate, send_packet_execute, send_packet_validate,
    timeout_on_close_packet_execute, timeout_on_close_packet_validate, timeout_packet_execute,
    timeout_packet_validate,
};
use ibc_relay_channel::types::msgs::{packet_msg_to_port_id, PacketMsg};
use ibc_relay_client::context::prelude::*;
use ibc_relay_client::handler::{create_client, provide_counterparty, update_client};
use ibc_relay_client::types::msgs::ClientMsg;
use ibc_relay_handler_types::error::HandlerError;
use ibc_relay_handler_types::msgs::{MsgEnvelope, MsgResult};
use ibc_relay_host::types::identifiers::PortId;
use ibc_relay_host::{ExecutionContext, ValidationContext};
use ibc_relay_router::module::Module;
use ibc_relay_router::router::Router;
use ibc_relay_router::types::error::RouterError;

/// Entrypoint which performs both validation and message execution
pub fn dispatch<Ctx, C, R>(
    ctx: &mut Ctx,
    clients: &C,
    router: &mut R,
    msg: MsgEnvelope,
) -> Result<MsgResult, HandlerError>
where
    Ctx: ExecutionContext,
    C: ClientRouter + ?Sized,
    R: Router + ?Sized,
{
    match validate(ctx, clients, router, msg.clone()) {
        Err(e) if e.is_no_op() => return Ok(MsgResult::NoOp),
        result => result?,
    }

    execute(ctx, clients, router, msg)
}

/// Entrypoint which only performs message validation
///
/// If a transaction contains `n` messages `m_1` ... `m_n`, then
/// they MUST be processed as follows:
///     validate(m_1), execute(m_1), ..., validate(m_n), execute(m_n)
/// That is, the state transition of message `i` must be applied before
/// message `i+1` is validated. This is equivalent to calling
/// `dispatch()` on each successively.
///
/// A redundant packet message fails validation with the no-op error, see
/// [`HandlerError::is_no_op`].
pub fn validate<Ctx, C, R>(
    ctx: &Ctx,
    clients: &C,
    router: &R,
    msg: MsgEnvelope,
) -> Result<(), HandlerError>
where
    Ctx: ValidationContext,
    C: ClientRouter + ?Sized,
    R: Router + ?Sized,
{
    match msg {
        MsgEnvelope::Client(msg) => match msg {
            ClientMsg::CreateClient(msg) => create_client::validate(ctx, clients, msg),
            ClientMsg::UpdateClient(msg) => update_client::validate(ctx, clients, msg),
            ClientMsg::ProvideCounterparty(msg) => {
                provide_counterparty::validate(ctx, clients, msg)
            }
        }?,
        MsgEnvelope::Packet(msg) => {
            let module = route_module(router, packet_msg_to_port_id(&msg))?;

            match msg {
                PacketMsg::Send(msg) => send_packet_validate(ctx, clients, module, &msg),
                PacketMsg::Recv(msg) => recv_packet_validate(ctx, clients, &msg),
                PacketMsg::Ack(msg) => acknowledgement_packet_validate(ctx, clients, module, &msg),
                PacketMsg::Timeout(msg) => timeout_packet_validate(ctx, clients, module, &msg),
                PacketMsg::TimeoutOnClose(msg) => {
                    timeout_on_close_packet_validate(ctx, clients, module, &msg)
                }
            }?
        }
    }

    Ok(())
}

/// Entrypoint which only performs message execution
///
/// A packet message found redundant at execution time leaves the state
/// untouched and yields [`MsgResult::NoOp`].
pub fn execute<Ctx, C, R>(
    ctx: &mut Ctx,
    clients: &C,
    router: &mut R,
    msg: MsgEnvelope,
) -> Result<MsgResult, HandlerError>
where
    Ctx: ExecutionContext,
    C: ClientRouter + ?Sized,
    R: Router + ?Sized,
{
    let result = match msg {
        MsgEnvelope::Client(msg) => match msg {
            ClientMsg::CreateClient(msg) => create_client::execute(ctx, clients, msg),
            ClientMsg::UpdateClient(msg) => update_client::execute(ctx, clients, msg),
            ClientMsg::ProvideCounterparty(msg) => provide_counterparty::execute(ctx, msg),
        }
        .map(|()| MsgResult::Executed)
        .map_err(HandlerError::from),
        MsgEnvelope::Packet(msg) => {
            let module = route_module_mut(router, packet_msg_to_port_id(&msg))?;

            match msg {
                PacketMsg::Send(msg) => send_packet_execute(ctx, module, msg).map(MsgResult::Sent),
                PacketMsg::Recv(msg) => {
                    recv_packet_execute(ctx, module, msg).map(|()| MsgResult::Executed)
                }
                PacketMsg::Ack(msg) => {
                    acknowledgement_packet_execute(ctx, module, msg).map(|()| MsgResult::Executed)
                }
                PacketMsg::Timeout(msg) => {
                    timeout_packet_execute(ctx, module, msg).map(|()| MsgResult::Executed)
                }
                PacketMsg::TimeoutOnClose(msg) => {
                    timeout_on_close_packet_execute(ctx, module, msg).map(|()| MsgResult::Executed)
                }
            }
            .map_err(HandlerError::from)
        }
    };

    match result {
        Err(e) if e.is_no_op() => Ok(MsgResult::NoOp),
        result => result,
    }
}

/// Resolves the application module bound to `port_id`.
pub(crate) fn route_module<'r, R>(router: &'r R, port_id: &PortId) -> Result<&'r dyn Module, RouterError>
where
    R: Router + ?Sized,
{
    let module_id = router.module_for_port(port_id)?;

    router
        .get_route(&module_id)
        .ok_or(RouterError::MissingModule { module_id })
}

fn route_module_mut<'r, R>(router: &'r mut R, port_id: &PortId) -> Result<&'r mut dyn Module, RouterError>
where
    R: Router + ?Sized,
{
    let module_id = router.module_for_port(port_id)?;

    router
        .get_route_mut(&module_id)
        .ok_or(RouterError::MissingModule { module_id })
}
