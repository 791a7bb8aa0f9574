use ibc_relay_core::channel::types::channel::Order;
use ibc_relay_core::channel::types::msgs::{MsgRecvPacket, PacketMsg};
use ibc_relay_core::channel::types::packet::Packet;
use ibc_relay_core::commitment_types::commitment::CommitmentProofBytes;
use ibc_relay_core::handler::redundancy::check_redundancy;
use ibc_relay_core::handler::types::error::{ErrorKind, HandlerError};
use ibc_relay_core::handler::types::msgs::MsgEnvelope;
use ibc_relay_core::host::types::path::{CommitmentPath, ReceiptPath};
use ibc_relay_core::host::ValidationContext;
use ibc_relay_testkit::fixtures::core::channel::MsgSendPacketConfig;
use ibc_relay_testkit::testapp::ibc::applications::mock::MockModule;
use rstest::{fixture, rstest};

use crate::core::{classic_pair, client_update_on_b, RelayedPair};

/// Two packets sent from A; the first one was already received by B.
struct Scenario {
    pair: RelayedPair,
    received: Packet,
    pending: Packet,
    recv_received: MsgRecvPacket,
    recv_pending: MsgRecvPacket,
}

#[fixture]
fn scenario() -> Scenario {
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), MockModule::new());

    let received = pair
        .relayer
        .send_packet_on_a(MsgSendPacketConfig::builder().build())
        .expect("send succeeds");
    let pending = pair
        .relayer
        .send_packet_on_a(MsgSendPacketConfig::builder().build())
        .expect("send succeeds");

    let recv_received = pair
        .relayer
        .build_recv_packet_on_b(&pair.client_id_on_b, &received);
    pair.relayer
        .b
        .deliver(PacketMsg::from(recv_received.clone()))
        .expect("receive succeeds");

    let recv_pending = pair
        .relayer
        .build_recv_packet_on_b(&pair.client_id_on_b, &pending);

    Scenario {
        pair,
        received,
        pending,
        recv_received,
        recv_pending,
    }
}

fn recv(msg: &MsgRecvPacket) -> MsgEnvelope {
    PacketMsg::from(msg.clone()).into()
}

fn check_on_b(pair: &RelayedPair, msgs: &[MsgEnvelope], is_check_tx: bool, simulate: bool) -> Result<(), HandlerError> {
    let ctx_b = pair.relayer.get_ctx_b();
    check_redundancy(ctx_b, &*ctx_b.clients, &pair.relayer.b.router, msgs, is_check_tx, simulate)
}

fn check_on_a(pair: &RelayedPair, msgs: &[MsgEnvelope]) -> Result<(), HandlerError> {
    let ctx_a = pair.relayer.get_ctx_a();
    check_redundancy(ctx_a, &*ctx_a.clients, &pair.relayer.a.router, msgs, true, false)
}

fn has_receipt(pair: &RelayedPair, packet: &Packet) -> bool {
    let receipt_path = ReceiptPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);
    pair.relayer
        .get_ctx_b()
        .get_packet_receipt(&receipt_path)
        .expect("no error")
        .is_some()
}

#[rstest]
fn all_redundant_transaction_is_rejected(scenario: Scenario) {
    let Scenario {
        pair, recv_received, ..
    } = scenario;

    let msgs = vec![client_update_on_b(&pair).into(), recv(&recv_received)];

    let err = check_on_b(&pair, &msgs, true, false).expect_err("nothing left to relay");
    assert!(
        matches!(err, HandlerError::RedundantTransaction { total: 1 }),
        "{err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::Routing);
}

#[rstest]
fn transaction_with_one_useful_message_is_admitted(scenario: Scenario) {
    let Scenario {
        pair,
        pending,
        recv_received,
        recv_pending,
        ..
    } = scenario;

    let msgs = vec![recv(&recv_received), recv(&recv_pending)];

    assert!(check_on_b(&pair, &msgs, true, false).is_ok());
    // the check works on scratch state
    assert!(!has_receipt(&pair, &pending));
}

#[rstest]
fn duplicate_within_a_transaction_counts_once(scenario: Scenario) {
    let Scenario {
        pair, recv_pending, ..
    } = scenario;

    let msgs = vec![recv(&recv_pending), recv(&recv_pending)];

    assert!(check_on_b(&pair, &msgs, true, false).is_ok());
}

#[rstest]
fn transaction_with_other_messages_is_admitted(scenario: Scenario) {
    let Scenario {
        pair, recv_received, ..
    } = scenario;

    let send: MsgEnvelope = PacketMsg::from(ibc_relay_core::channel::types::msgs::MsgSendPacket::from(
        MsgSendPacketConfig::builder().build(),
    ))
    .into();
    let msgs = vec![recv(&recv_received), send];

    assert!(check_on_b(&pair, &msgs, true, false).is_ok());
}

#[rstest]
#[case::delivery(false, false)]
#[case::simulation(true, true)]
fn filter_runs_only_at_admission(scenario: Scenario, #[case] is_check_tx: bool, #[case] simulate: bool) {
    let Scenario {
        pair, recv_received, ..
    } = scenario;

    let msgs = vec![recv(&recv_received)];

    assert!(check_on_b(&pair, &msgs, is_check_tx, simulate).is_ok());
}

#[rstest]
fn invalid_message_rejects_the_transaction(scenario: Scenario) {
    let Scenario {
        pair,
        mut recv_pending,
        ..
    } = scenario;

    recv_pending.proof_commitment_on_a = CommitmentProofBytes::try_from(vec![1; 32]).expect("no error");

    let err = check_on_b(&pair, &[recv(&recv_pending)], true, false).expect_err("forged proof");
    assert_eq!(err.kind(), ErrorKind::Proof);
}

#[rstest]
fn settled_acknowledgements_are_redundant(scenario: Scenario) {
    let Scenario {
        mut pair, received, ..
    } = scenario;

    let ack = pair
        .relayer
        .acknowledgement_on_b(&received)
        .expect("acknowledgement written");
    let msg = pair
        .relayer
        .build_ack_packet_on_a(&pair.client_id_on_a, &received, ack);
    let ack_msg: MsgEnvelope = PacketMsg::from(msg).into();

    // unsettled, a duplicate in the same transaction is the only redundancy
    assert!(check_on_a(&pair, &[ack_msg.clone(), ack_msg.clone()]).is_ok());

    let commitment_path = CommitmentPath::new(&received.port_id_on_a, &received.chan_id_on_a, received.seq_on_a);
    assert!(pair
        .relayer
        .get_ctx_a()
        .get_packet_commitment(&commitment_path)
        .expect("no error")
        .is_some());

    pair.relayer
        .a
        .deliver(ack_msg.clone())
        .expect("acknowledgement succeeds");

    let err = check_on_a(&pair, &[ack_msg.clone(), ack_msg]).expect_err("already settled");
    assert!(
        matches!(err, HandlerError::RedundantTransaction { total: 2 }),
        "{err:?}"
    );
}

/// `total` receives of which the first `received` already landed on B.
fn partially_received(total: u64, received: u64) -> (RelayedPair, Vec<MsgEnvelope>) {
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), MockModule::new());

    let packets: Vec<Packet> = (0..total)
        .map(|_| {
            pair.relayer
                .send_packet_on_a(MsgSendPacketConfig::builder().build())
                .expect("send succeeds")
        })
        .collect();

    for packet in packets.iter().take(received as usize) {
        let msg = pair
            .relayer
            .build_recv_packet_on_b(&pair.client_id_on_b, packet);
        pair.relayer
            .b
            .deliver(PacketMsg::from(msg))
            .expect("receive succeeds");
    }

    let msgs = packets
        .iter()
        .map(|packet| {
            let msg = pair
                .relayer
                .build_recv_packet_on_b(&pair.client_id_on_b, packet);
            recv(&msg)
        })
        .collect();

    (pair, msgs)
}

#[rstest]
#[case::empty(0, 0)]
#[case::one_pending(1, 0)]
#[case::one_received(1, 1)]
#[case::one_of_two_received(2, 1)]
#[case::two_received(2, 2)]
#[case::none_of_three_received(3, 0)]
#[case::two_of_three_received(3, 2)]
#[case::three_received(3, 3)]
fn transaction_is_rejected_only_when_every_receive_is_redundant(
    #[case] total: u64,
    #[case] received: u64,
) {
    let (pair, msgs) = partially_received(total, received);

    let res = check_on_b(&pair, &msgs, true, false);

    if total > 0 && received == total {
        assert!(
            matches!(res, Err(HandlerError::RedundantTransaction { total: t }) if t == total),
            "{res:?}"
        );
    } else {
        assert!(res.is_ok(), "{res:?}");
    }
}
