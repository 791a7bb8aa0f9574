//! Drives two mock chains the way a relayer would: client creation and
//! updates, channel setup, and building proof-carrying packet messages from
//! the counterparty's state.

use ibc_relay_core::channel::handler::packet_route;
use ibc_relay_core::channel::types::acknowledgement::Acknowledgement;
use ibc_relay_core::channel::types::channel::{ChannelEnd, Counterparty as ChannelCounterparty, Order, State};
use ibc_relay_core::channel::types::commitment::compute_ack_commitment;
use ibc_relay_core::channel::types::msgs::{
    MsgAcknowledgement, MsgRecvPacket, MsgSendPacket, MsgTimeout, MsgTimeoutOnClose, PacketMsg,
};
use ibc_relay_core::channel::types::packet::Packet;
use ibc_relay_core::channel::types::Version;
use ibc_relay_core::client::types::msgs::{ClientMsg, MsgProvideCounterparty};
use ibc_relay_core::client::types::{Counterparty, Height};
use ibc_relay_core::commitment_types::commitment::CommitmentProofBytes;
use ibc_relay_core::commitment_types::merkle::MerklePath;
use ibc_relay_core::handler::types::error::HandlerError;
use ibc_relay_core::handler::types::events::IbcEvent;
use ibc_relay_core::handler::types::msgs::{MsgEnvelope, MsgResult};
use ibc_relay_core::host::types::identifiers::{ChannelId, ClientId, PortId, Sequence};
use ibc_relay_core::host::types::path::{
    AckPath, ChannelEndPath, CommitmentPath, Path, ReceiptPath, SeqRecvPath,
};
use ibc_relay_core::host::{ExecutionContext, ValidationContext};
use ibc_relay_core::primitives::prelude::*;
use ibc_relay_core::primitives::Signer;

use crate::fixtures::core::client::{dummy_msg_create_client, dummy_msg_update_client};
use crate::fixtures::core::signer::dummy_account_id;
use crate::testapp::ibc::applications::mock::mock_port_id;
use crate::testapp::ibc::clients::mock::proof::{membership_proof, non_membership_proof};
use crate::testapp::ibc::core::router::MockRouter;
use crate::testapp::ibc::core::types::MockContext;

/// One side of a relayed route.
#[derive(Debug)]
pub struct Chain {
    pub ctx: MockContext,
    pub router: MockRouter,
}

impl Chain {
    pub fn new(ctx: MockContext, router: MockRouter) -> Self {
        Self { ctx, router }
    }

    pub fn deliver(&mut self, msg: impl Into<MsgEnvelope>) -> Result<MsgResult, HandlerError> {
        self.ctx.deliver(&mut self.router, msg.into())
    }

    /// Proof that `value` is stored at `path` on this chain, as verified
    /// by the local end `(port_id, chan_id)` of `verifier`.
    fn prove(
        verifier: &MockContext,
        port_id: &PortId,
        chan_id: &ChannelId,
        path: Path,
        value: Option<&[u8]>,
    ) -> CommitmentProofBytes {
        let merkle_path = packet_route(verifier, port_id, chan_id)
            .and_then(|route| route.merkle_path(path))
            .expect("verifier has a route to this chain");

        match value {
            Some(value) => membership_proof(&merkle_path, value),
            None => non_membership_proof(&merkle_path),
        }
    }
}

/// A pair of chains, `A` and `B`, and the relayer operations between them.
#[derive(Debug)]
pub struct RelayerContext {
    pub a: Chain,
    pub b: Chain,
    pub signer: Signer,
}

impl RelayerContext {
    pub fn new(a: Chain, b: Chain) -> Self {
        Self {
            a,
            b,
            signer: dummy_account_id(),
        }
    }

    /// The same pair, seen from `B`.
    pub fn reversed(self) -> Self {
        Self {
            a: self.b,
            b: self.a,
            signer: self.signer,
        }
    }

    pub fn get_ctx_a(&self) -> &MockContext {
        &self.a.ctx
    }

    pub fn get_ctx_b(&self) -> &MockContext {
        &self.b.ctx
    }

    /// Creates a client of `B` on `A`, trusting `B`'s latest header.
    pub fn create_client_on_a(&mut self) -> ClientId {
        create_client(&mut self.a, &self.b)
    }

    /// Creates a client of `A` on `B`, trusting `A`'s latest header.
    pub fn create_client_on_b(&mut self) -> ClientId {
        create_client(&mut self.b, &self.a)
    }

    /// Updates the client of `B` on `A` to `B`'s latest header, returning
    /// the height proofs about `B` can now be checked at.
    pub fn update_client_on_a(&mut self, client_id_on_a: &ClientId) -> Height {
        update_client(&mut self.a, &self.b, client_id_on_a)
    }

    /// Updates the client of `A` on `B` to `A`'s latest header.
    pub fn update_client_on_b(&mut self, client_id_on_b: &ClientId) -> Height {
        update_client(&mut self.b, &self.a, client_id_on_b)
    }

    /// Provisions an open channel between `chan_id_on_a` and `chan_id_on_b`
    /// on the mock port of both chains, tracked by the given clients.
    pub fn open_channel(
        &mut self,
        ordering: Order,
        client_id_on_a: &ClientId,
        chan_id_on_a: &ChannelId,
        client_id_on_b: &ClientId,
        chan_id_on_b: &ChannelId,
    ) {
        let version = Version::new("mock-v1".to_string());

        let chan_end_on_a = ChannelEnd::new(
            State::Open,
            ordering,
            ChannelCounterparty::new(mock_port_id(), chan_id_on_b.clone(), client_id_on_b.clone()),
            client_id_on_a.clone(),
            self.b.ctx.commitment_prefix(),
            Default::default(),
            version.clone(),
        );
        let chan_end_on_b = ChannelEnd::new(
            State::Open,
            ordering,
            ChannelCounterparty::new(mock_port_id(), chan_id_on_a.clone(), client_id_on_a.clone()),
            client_id_on_b.clone(),
            self.a.ctx.commitment_prefix(),
            Default::default(),
            version,
        );

        self.a
            .ctx
            .store_channel(&ChannelEndPath::new(&mock_port_id(), chan_id_on_a), chan_end_on_a)
            .expect("no error");
        self.b
            .ctx
            .store_channel(&ChannelEndPath::new(&mock_port_id(), chan_id_on_b), chan_end_on_b)
            .expect("no error");
    }

    /// Closes `B`'s end of a provisioned channel.
    pub fn close_channel_on_b(&mut self, chan_id_on_b: &ChannelId) {
        let path = ChannelEndPath::new(&mock_port_id(), chan_id_on_b);
        let mut chan_end_on_b = self
            .b
            .ctx
            .channel_end(&path)
            .expect("no error")
            .expect("channel exists");

        chan_end_on_b.set_state(State::Closed);
        self.b
            .ctx
            .store_channel(&path, chan_end_on_b)
            .expect("no error");
    }

    /// Binds the two clients to each other, so that each chain routes
    /// packets addressed by the other's client identifier.
    pub fn bind_lite_clients(&mut self, client_id_on_a: &ClientId, client_id_on_b: &ClientId) {
        let prefix_of = |ctx: &MockContext| {
            MerklePath::try_from(&ctx.commitment_prefix()).expect("mock prefix is UTF-8")
        };

        let msg_on_a = MsgProvideCounterparty::new(
            client_id_on_a.clone(),
            Counterparty::new(client_id_on_b.clone(), prefix_of(&self.b.ctx)),
            self.signer.clone(),
        );
        let msg_on_b = MsgProvideCounterparty::new(
            client_id_on_b.clone(),
            Counterparty::new(client_id_on_a.clone(), prefix_of(&self.a.ctx)),
            self.signer.clone(),
        );

        self.a
            .deliver(ClientMsg::from(msg_on_a))
            .expect("binding succeeds");
        self.b
            .deliver(ClientMsg::from(msg_on_b))
            .expect("binding succeeds");
    }

    /// Sends a packet from `A`, returning it.
    pub fn send_packet_on_a(&mut self, msg: MsgSendPacket) -> Result<Packet, HandlerError> {
        match self.a.deliver(PacketMsg::from(msg.clone()))? {
            MsgResult::Sent(sequence) => Ok(msg.packet(sequence)),
            result => panic!("send resulted in {result:?}"),
        }
    }

    /// Builds the `MsgRecvPacket` delivering `packet` to `B`, after
    /// updating `client_id_on_b` to `A`'s latest header.
    pub fn build_recv_packet_on_b(&mut self, client_id_on_b: &ClientId, packet: &Packet) -> MsgRecvPacket {
        let proof_height_on_a = self.update_client_on_b(client_id_on_b);

        let commitment_path = CommitmentPath::new(&packet.port_id_on_a, &packet.chan_id_on_a, packet.seq_on_a);
        let commitment = self
            .a
            .ctx
            .query(commitment_path.clone())
            .unwrap_or_else(|| packet.commitment().into_vec());

        let proof_commitment_on_a = Chain::prove(
            &self.b.ctx,
            &packet.port_id_on_b,
            &packet.chan_id_on_b,
            commitment_path.into(),
            Some(&commitment),
        );

        MsgRecvPacket {
            packet: packet.clone(),
            proof_commitment_on_a,
            proof_height_on_a,
            signer: self.signer.clone(),
        }
    }

    /// The acknowledgement `B` wrote for `packet`, if any.
    pub fn acknowledgement_on_b(&self, packet: &Packet) -> Option<Acknowledgement> {
        self.b.ctx.get_events().into_iter().rev().find_map(|event| match event {
            IbcEvent::WriteAcknowledgement(event) if event.packet() == packet => {
                Some(event.acknowledgement().clone())
            }
            _ => None,
        })
    }

    /// Builds the `MsgAcknowledgement` settling `packet` on `A`, after
    /// updating `client_id_on_a` to `B`'s latest header.
    pub fn build_ack_packet_on_a(
        &mut self,
        client_id_on_a: &ClientId,
        packet: &Packet,
        acknowledgement: Acknowledgement,
    ) -> MsgAcknowledgement {
        let proof_height_on_b = self.update_client_on_a(client_id_on_a);

        let ack_path = AckPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);
        let ack_commitment = compute_ack_commitment(&acknowledgement).into_vec();

        let proof_acked_on_b = Chain::prove(
            &self.a.ctx,
            &packet.port_id_on_a,
            &packet.chan_id_on_a,
            ack_path.into(),
            Some(&ack_commitment),
        );

        MsgAcknowledgement {
            packet: packet.clone(),
            acknowledgement,
            proof_acked_on_b,
            proof_height_on_b,
            signer: self.signer.clone(),
        }
    }

    /// Builds the `MsgTimeout` settling `packet` on `A`, proving from `B`'s
    /// state that it was never received.
    pub fn build_timeout_packet_on_a(&mut self, client_id_on_a: &ClientId, packet: &Packet) -> MsgTimeout {
        let proof_height_on_b = self.update_client_on_a(client_id_on_a);
        let (next_seq_recv_on_b, proof_unreceived_on_b) = self.prove_unreceived_on_b(packet);

        MsgTimeout {
            packet: packet.clone(),
            next_seq_recv_on_b,
            proof_unreceived_on_b,
            proof_height_on_b,
            signer: self.signer.clone(),
        }
    }

    /// Builds the `MsgTimeoutOnClose` settling `packet` on `A` once `B`
    /// closed its end of the channel.
    pub fn build_timeout_on_close_packet_on_a(
        &mut self,
        client_id_on_a: &ClientId,
        packet: &Packet,
    ) -> MsgTimeoutOnClose {
        let proof_height_on_b = self.update_client_on_a(client_id_on_a);
        let (next_seq_recv_on_b, proof_unreceived_on_b) = self.prove_unreceived_on_b(packet);

        let channel_end_path = ChannelEndPath::new(&packet.port_id_on_b, &packet.chan_id_on_b);
        let chan_end_on_b = self
            .b
            .ctx
            .query(channel_end_path.clone())
            .expect("channel exists on B");

        let proof_close_on_b = Chain::prove(
            &self.a.ctx,
            &packet.port_id_on_a,
            &packet.chan_id_on_a,
            channel_end_path.into(),
            Some(&chan_end_on_b),
        );

        MsgTimeoutOnClose {
            packet: packet.clone(),
            next_seq_recv_on_b,
            proof_unreceived_on_b,
            proof_close_on_b,
            proof_height_on_b,
            signer: self.signer.clone(),
        }
    }

    /// Unordered routes prove the receipt absent, ordered channels prove
    /// `B`'s next expected sequence. Both read `B`'s actual state.
    fn prove_unreceived_on_b(&self, packet: &Packet) -> (Sequence, CommitmentProofBytes) {
        let route_on_b = packet_route(&self.b.ctx, &packet.port_id_on_b, &packet.chan_id_on_b)
            .expect("B has a route for the packet");

        match route_on_b.ordering() {
            Order::Ordered => {
                let seq_recv_path = SeqRecvPath::new(&packet.port_id_on_b, &packet.chan_id_on_b);
                let next_seq_recv_on_b = self
                    .b
                    .ctx
                    .get_next_sequence_recv(&seq_recv_path)
                    .expect("no error");

                let proof = Chain::prove(
                    &self.a.ctx,
                    &packet.port_id_on_a,
                    &packet.chan_id_on_a,
                    seq_recv_path.into(),
                    Some(&next_seq_recv_on_b.to_vec()),
                );

                (next_seq_recv_on_b, proof)
            }
            Order::Unordered => {
                let receipt_path =
                    ReceiptPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);

                // a receipt on B can only be proven present
                let receipt = self.b.ctx.query(receipt_path.clone());

                let proof = Chain::prove(
                    &self.a.ctx,
                    &packet.port_id_on_a,
                    &packet.chan_id_on_a,
                    receipt_path.into(),
                    receipt.as_deref(),
                );

                (packet.seq_on_a, proof)
            }
        }
    }
}

fn create_client(host: &mut Chain, counterparty: &Chain) -> ClientId {
    let msg = dummy_msg_create_client(counterparty.ctx.latest_header());

    host.deliver(ClientMsg::from(msg))
        .expect("client creation succeeds");

    host.ctx
        .get_events()
        .into_iter()
        .rev()
        .find_map(|event| match event {
            IbcEvent::CreateClient(event) => Some(event.client_id().clone()),
            _ => None,
        })
        .expect("client creation emits an event")
}

fn update_client(host: &mut Chain, counterparty: &Chain, client_id: &ClientId) -> Height {
    let header = counterparty.ctx.latest_header();
    let msg = dummy_msg_update_client(client_id.clone(), header);

    host.deliver(ClientMsg::from(msg))
        .expect("client update succeeds");

    header.height()
}
