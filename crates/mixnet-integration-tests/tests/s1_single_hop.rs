//! S1 (debug, single hop): 1 client, 1 relay with `POOL_SIZE = 1`, 1
//! collector, debug mode on. Expected: the collector sink yields exactly
//! the sent payload.

use std::time::Duration;

use mixnet_collector::{Collector, Sink};
use mixnet_config::MixnetConfig;
use mixnet_crypto::rsa_oaep::{encode_public_key_der, generate_keypair};
use mixnet_onion::{build_onion, ChainBuilder};
use mixnet_relay::Relay;
use mixnet_types::RelayDescriptor;

async fn wait_for_record(sink: &Sink, budget: Duration) -> Option<Vec<u8>> {
    let deadline = tokio::time::Instant::now() + budget;
    loop {
        if let Some(record) = sink.pop() {
            return Some(record);
        }
        if tokio::time::Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn single_hop_debug_delivers_exact_payload() {
    let (relay_private, relay_public) = generate_keypair().expect("relay keygen");
    let (collector_private, _collector_public) = generate_keypair().expect("collector keygen");

    let relay_config = MixnetConfig {
        pool_size: 1,
        debug_mode: true,
        ..MixnetConfig::default()
    };
    let collector_config = MixnetConfig {
        debug_mode: true,
        ..MixnetConfig::default()
    };

    let mut collector = Collector::bind("127.0.0.1", 0, collector_private, collector_config)
        .await
        .expect("bind collector");
    let collector_port = collector.local_port().expect("collector port");
    let sink = collector.sink();
    tokio::spawn(async move {
        collector.run().await;
    });

    let mut relay = Relay::bind("127.0.0.1", 0, relay_private, relay_config)
        .await
        .expect("bind relay");
    let relay_port = relay.local_port().expect("relay port");
    tokio::spawn(async move {
        relay.run().await;
    });

    let descriptor = RelayDescriptor {
        address: "127.0.0.1".into(),
        port: relay_port,
        public_key_der: encode_public_key_der(&relay_public).expect("encode"),
    };
    let chain = ChainBuilder::new().add_relay(descriptor).expect("add relay").build();

    let onion = build_onion(
        &chain,
        None,
        "127.0.0.1",
        collector_port,
        b"42;EGGED;7;08:05;A;B",
        true,
    )
    .expect("build onion");

    mixnet_transport::send(&onion.next_host, onion.next_port, &onion.wire)
        .await
        .expect("send to head relay");

    let record = wait_for_record(&sink, Duration::from_secs(5))
        .await
        .expect("collector sink should yield the delivered record");
    assert_eq!(record, b"42;EGGED;7;08:05;A;B");
}
