mod testsupport;

use std::sync::Arc;
use std::time::Duration;

use odradek::prelude::{Broker, Error, SaslConfig};
use testsupport::{api_versions_unsupported, Reply, SpyConnection};

const SASL_HANDSHAKE: i16 = 17;
const SASL_AUTHENTICATE: i16 = 36;
const API_VERSIONS: i16 = 18;
const METADATA: i16 = 3;

#[tokio::test]
async fn connect_is_idempotent() {
    let mut script = testsupport::negotiation();
    script.extend(testsupport::authentication(0));
    let spy = SpyConnection::new(script);

    let broker = Broker::new(spy.clone()).sasl(SaslConfig::plain(
        String::from("user"),
        String::from("pass"),
    ));

    broker.connect().await.unwrap();
    broker.connect().await.unwrap();

    assert_eq!(spy.connect_calls(), 1);
    assert_eq!(spy.count_api(SASL_HANDSHAKE), 1);
    assert_eq!(spy.count_api(SASL_AUTHENTICATE), 1);
}

#[tokio::test]
async fn concurrent_connects_share_one_bring_up() {
    let mut script = testsupport::negotiation();
    script.extend(testsupport::authentication(0));
    script.push(Reply::Frame(testsupport::metadata_empty()));
    script.push(Reply::Frame(testsupport::metadata_empty()));
    let spy = SpyConnection::with_connect_delay(script, Duration::from_millis(50));

    let broker = Arc::new(Broker::new(spy.clone()).sasl(SaslConfig::plain(
        String::from("user"),
        String::from("pass"),
    )));

    let left = {
        let broker = broker.clone();
        tokio::spawn(async move { broker.metadata(vec![]).await })
    };
    let right = {
        let broker = broker.clone();
        tokio::spawn(async move { broker.metadata(vec![]).await })
    };

    left.await.unwrap().unwrap();
    right.await.unwrap().unwrap();

    assert_eq!(spy.connect_calls(), 1);
    assert_eq!(spy.count_api(API_VERSIONS), 2); // one rejected probe + one accepted
    assert_eq!(spy.count_api(SASL_HANDSHAKE), 1);
    assert_eq!(spy.count_api(SASL_AUTHENTICATE), 1);
    assert_eq!(spy.count_api(METADATA), 2);
}

#[tokio::test]
async fn connection_closed_clears_state_and_reconnects() {
    let mut script = testsupport::negotiation();
    script.push(Reply::Error(Error::ConnectionClosed));
    let spy = SpyConnection::new(script);

    let broker = Broker::new(spy.clone());
    broker.connect().await.unwrap();
    assert!(broker.is_connected());

    let err = broker.metadata(vec![]).await.unwrap_err();
    assert_eq!(err, Error::ConnectionClosed);
    assert_eq!(spy.disconnect_calls(), 1);
    assert!(!broker.is_connected());

    // the next request reconnects; the version table survives, so no
    // renegotiation happens
    spy.push_replies(vec![Reply::Frame(testsupport::metadata_empty())]);
    broker.metadata(vec![]).await.unwrap();
    assert_eq!(spy.connect_calls(), 2);
    assert_eq!(spy.count_api(API_VERSIONS), 2);
}

#[tokio::test]
async fn negotiation_failure_is_fatal_for_connect() {
    // a broker that rejects every candidate
    let script = vec![
        Reply::Frame(api_versions_unsupported()),
        Reply::Frame(api_versions_unsupported()),
        Reply::Frame(api_versions_unsupported()),
        Reply::Frame(api_versions_unsupported()),
    ];
    let spy = SpyConnection::new(script);

    let broker = Broker::new(spy.clone());
    let err = broker.connect().await.unwrap_err();
    assert_eq!(err, Error::ApiVersionsNotSupported);
}
