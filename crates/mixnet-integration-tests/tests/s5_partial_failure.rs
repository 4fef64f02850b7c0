//! S5 (partial failure): 1 client, 3 relays, collector unreachable at its
//! port. Expected: the tail relay exhausts its `MAX_TRIES` retries on each
//! forward, logs and drops the packet, and keeps accepting — the client's
//! handoff to the head relay succeeds every time regardless of what
//! happens downstream, and no relay task ever panics.

use mixnet_config::MixnetConfig;
use mixnet_crypto::rsa_oaep::{encode_public_key_der, generate_keypair};
use mixnet_onion::{build_onion, ChainBuilder};
use mixnet_relay::Relay;
use mixnet_types::RelayDescriptor;

const HOP_COUNT: usize = 3;
const ATTEMPTS: usize = 3;

/// Grab a port with nothing listening on it: bind once, then drop the
/// listener so every subsequent connect is refused.
fn unreachable_port() -> u16 {
    let probe = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let port = probe.local_addr().expect("addr").port();
    drop(probe);
    port
}

#[tokio::test]
async fn unreachable_collector_does_not_crash_the_chain() {
    let unreachable_collector_port = unreachable_port();

    let mut descriptors = Vec::with_capacity(HOP_COUNT);
    for _ in 0..HOP_COUNT {
        let (private_key, public_key) = generate_keypair().expect("relay keygen");
        let relay_config = MixnetConfig {
            pool_size: 1,
            debug_mode: true,
            ..MixnetConfig::default()
        };
        let mut relay = Relay::bind("127.0.0.1", 0, private_key, relay_config)
            .await
            .expect("bind relay");
        let port = relay.local_port().expect("relay port");
        tokio::spawn(async move {
            relay.run().await;
        });
        descriptors.push(RelayDescriptor {
            address: "127.0.0.1".into(),
            port,
            public_key_der: encode_public_key_der(&public_key).expect("encode"),
        });
    }

    let mut builder = ChainBuilder::new();
    for descriptor in descriptors {
        builder = builder.add_relay(descriptor).expect("add relay");
    }
    let chain = builder.build();

    for i in 0..ATTEMPTS {
        let payload = format!("doomed-{i}").into_bytes();
        let onion = build_onion(
            &chain,
            None,
            "127.0.0.1",
            unreachable_collector_port,
            &payload,
            true,
        )
        .expect("build onion");

        // The client only ever talks to the head relay; this must succeed
        // even though the tail relay's eventual forward to the collector
        // is doomed to fail after MAX_TRIES.
        mixnet_transport::send(&onion.next_host, onion.next_port, &onion.wire)
            .await
            .expect("client handoff to the head relay must succeed regardless of downstream failures");
    }

    // Give every relay time to peel, pool, attempt release, and exhaust its
    // retries for each of the three doomed sends, without panicking.
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    // A final, independent send still succeeds — proving the chain is
    // still listening and none of its relays crashed under the failures.
    let payload = b"still-alive".to_vec();
    let onion = build_onion(
        &chain,
        None,
        "127.0.0.1",
        unreachable_collector_port,
        &payload,
        true,
    )
    .expect("build onion");
    mixnet_transport::send(&onion.next_host, onion.next_port, &onion.wire)
        .await
        .expect("the relay chain must still be accepting after repeated downstream failures");
}
