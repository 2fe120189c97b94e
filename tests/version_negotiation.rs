mod testsupport;

use odradek::prelude::{Broker, Error, KafkaCode};
use testsupport::{
    api_versions_ok, api_versions_unsupported, request_api_key, request_api_version, Reply,
    SpyConnection,
};

const API_VERSIONS: i16 = 18;

// the broker only accepts ApiVersions v2; the negotiator must walk
// 3 -> 2, strictly descending, and settle on the accepted table
#[tokio::test]
async fn probes_descend_until_accepted() {
    let script = vec![
        Reply::Frame(api_versions_unsupported()),
        Reply::Frame(api_versions_ok(&[(3, 0, 4), (18, 0, 2)])),
    ];
    let spy = SpyConnection::new(script);

    let broker = Broker::new(spy.clone());
    broker.connect().await.unwrap();

    let probes: Vec<i16> = spy
        .requests()
        .iter()
        .filter(|r| request_api_key(r) == API_VERSIONS)
        .map(|r| request_api_version(r))
        .collect();
    assert_eq!(probes, vec![3, 2]);
}

#[tokio::test]
async fn exhausted_candidates_surface_a_terminal_error() {
    let script = vec![
        Reply::Frame(api_versions_unsupported()),
        Reply::Frame(api_versions_unsupported()),
        Reply::Frame(api_versions_unsupported()),
        Reply::Frame(api_versions_unsupported()),
    ];
    let spy = SpyConnection::new(script);

    let broker = Broker::new(spy.clone());
    assert_eq!(
        broker.connect().await.unwrap_err(),
        Error::ApiVersionsNotSupported
    );

    let probes: Vec<i16> = spy
        .requests()
        .iter()
        .map(|r| request_api_version(r))
        .collect();
    assert_eq!(probes, vec![3, 2, 1, 0]);
}

#[tokio::test]
async fn non_version_errors_abort_negotiation() {
    let mut body = vec![];
    {
        use odradek::prelude::encode::ToByte;
        1i32.encode(&mut body).unwrap();
        31i16.encode(&mut body).unwrap(); // cluster authorization failed
        0i32.encode(&mut body).unwrap();
    }
    let spy = SpyConnection::new(vec![Reply::Frame(body)]);

    let broker = Broker::new(spy.clone());
    assert_eq!(
        broker.connect().await.unwrap_err(),
        Error::KafkaError(KafkaCode::ClusterAuthorizationFailed)
    );
    // no further probes after a terminal error
    assert_eq!(spy.count_api(API_VERSIONS), 1);
}

// an RPC whose api key never made it into the negotiated table fails
// fast instead of hitting the wire
#[tokio::test]
async fn missing_api_key_is_unsupported_version() {
    let script = vec![
        Reply::Frame(api_versions_unsupported()),
        Reply::Frame(api_versions_ok(&[(18, 0, 2)])),
    ];
    let spy = SpyConnection::new(script);

    let broker = Broker::new(spy.clone());
    broker.connect().await.unwrap();

    let requests_before = spy.requests().len();
    assert_eq!(
        broker.metadata(vec![]).await.unwrap_err(),
        Error::UnsupportedVersion(3)
    );
    assert_eq!(spy.requests().len(), requests_before);
}
