mod testsupport;

use std::time::Duration;

use odradek::prelude::{Broker, SaslConfig};
use testsupport::{Reply, SpyConnection};

const SASL_HANDSHAKE: i16 = 17;
const SASL_AUTHENTICATE: i16 = 36;

// session lifetime 60s, threshold 10s: a call at 40s elapsed stays on
// the existing session, a call at 55s triggers a second SASL exchange
#[tokio::test(start_paused = true)]
async fn reauthenticates_inside_the_expiry_threshold() {
    let mut script = testsupport::negotiation();
    script.extend(testsupport::authentication(60000));
    script.push(Reply::Frame(testsupport::metadata_empty()));
    let spy = SpyConnection::new(script);

    let broker = Broker::new(spy.clone())
        .sasl(SaslConfig::plain(String::from("user"), String::from("pass")))
        .reauthentication_threshold_ms(10000);

    broker.metadata(vec![]).await.unwrap();
    assert_eq!(spy.count_api(SASL_AUTHENTICATE), 1);

    tokio::time::advance(Duration::from_millis(40000)).await;
    assert!(broker.is_connected());
    spy.push_replies(vec![Reply::Frame(testsupport::metadata_empty())]);
    broker.metadata(vec![]).await.unwrap();
    assert_eq!(spy.count_api(SASL_HANDSHAKE), 1);
    assert_eq!(spy.count_api(SASL_AUTHENTICATE), 1);

    tokio::time::advance(Duration::from_millis(15000)).await;
    assert!(!broker.is_connected());
    spy.push_replies(testsupport::authentication(60000));
    spy.push_replies(vec![Reply::Frame(testsupport::metadata_empty())]);
    broker.metadata(vec![]).await.unwrap();
    assert_eq!(spy.count_api(SASL_HANDSHAKE), 2);
    assert_eq!(spy.count_api(SASL_AUTHENTICATE), 2);
}

#[tokio::test(start_paused = true)]
async fn zero_session_lifetime_never_reauthenticates() {
    let mut script = testsupport::negotiation();
    script.extend(testsupport::authentication(0));
    script.push(Reply::Frame(testsupport::metadata_empty()));
    let spy = SpyConnection::new(script);

    let broker = Broker::new(spy.clone()).sasl(SaslConfig::plain(
        String::from("user"),
        String::from("pass"),
    ));

    broker.metadata(vec![]).await.unwrap();

    tokio::time::advance(Duration::from_millis(60 * 60 * 1000)).await;
    assert!(broker.is_connected());
    spy.push_replies(vec![Reply::Frame(testsupport::metadata_empty())]);
    broker.metadata(vec![]).await.unwrap();

    assert_eq!(spy.count_api(SASL_AUTHENTICATE), 1);
    assert_eq!(spy.connect_calls(), 1);
}
