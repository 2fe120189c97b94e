mod testsupport;

use odradek::prelude::{protocol, Broker, Error, JoinGroupOptions, KafkaCode};
use testsupport::{Reply, SpyConnection};

const JOIN_GROUP: i16 = 11;
const MEMBER_ID_REQUIRED: i16 = 79;

fn protocols() -> Vec<protocol::join_group::request::Protocol<'static>> {
    vec![protocol::join_group::request::Protocol::new(
        "roundrobin",
        vec!["a-topic"],
    )]
}

// the coordinator reserves "m-7" for us; the rejoin must carry it, and
// exactly two requests may hit the wire
#[tokio::test]
async fn retries_once_with_the_assigned_member_id() {
    let mut script = testsupport::negotiation();
    script.push(Reply::Frame(testsupport::join_group(
        MEMBER_ID_REQUIRED,
        "m-7",
    )));
    script.push(Reply::Frame(testsupport::join_group(0, "m-7")));
    let spy = SpyConnection::new(script);

    let broker = Broker::new(spy.clone());
    let response = broker
        .join_group("a-group", JoinGroupOptions::default(), protocols())
        .await
        .unwrap();

    assert_eq!(response.error_code, KafkaCode::None);
    assert_eq!(response.member_id, bytes::Bytes::from("m-7"));
    assert_eq!(spy.count_api(JOIN_GROUP), 2);

    // the retry body carries the assigned id
    let joins: Vec<Vec<u8>> = spy
        .requests()
        .into_iter()
        .filter(|r| testsupport::request_api_key(r) == JOIN_GROUP)
        .collect();
    let needle = b"m-7";
    assert!(!joins[0].windows(needle.len()).any(|w| w == needle));
    assert!(joins[1].windows(needle.len()).any(|w| w == needle));
}

#[tokio::test]
async fn a_second_rejection_surfaces_the_error() {
    let mut script = testsupport::negotiation();
    script.push(Reply::Frame(testsupport::join_group(
        MEMBER_ID_REQUIRED,
        "m-7",
    )));
    script.push(Reply::Frame(testsupport::join_group(
        MEMBER_ID_REQUIRED,
        "m-7",
    )));
    let spy = SpyConnection::new(script);

    let broker = Broker::new(spy.clone());
    let err = broker
        .join_group("a-group", JoinGroupOptions::default(), protocols())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        Error::MemberIdRequired {
            member_id: bytes::Bytes::from("m-7")
        }
    );
    assert_eq!(spy.count_api(JOIN_GROUP), 2);
}

// coordinator errors other than MEMBER_ID_REQUIRED ride back on the
// response payload without any retry
#[tokio::test]
async fn other_errors_pass_through_without_retry() {
    let mut script = testsupport::negotiation();
    script.push(Reply::Frame(testsupport::join_group(27, ""))); // rebalance in progress
    let spy = SpyConnection::new(script);

    let broker = Broker::new(spy.clone());
    let response = broker
        .join_group("a-group", JoinGroupOptions::default(), protocols())
        .await
        .unwrap();

    assert_eq!(response.error_code, KafkaCode::RebalanceInProgress);
    assert_eq!(spy.count_api(JOIN_GROUP), 1);
}
