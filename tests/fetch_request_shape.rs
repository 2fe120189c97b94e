mod testsupport;

use odradek::prelude::{Broker, FetchOptions, FetchPartition, FetchTopic};
use testsupport::{request_api_key, Reply, SpyConnection};

const FETCH: i16 = 1;

fn needle(topic: &str) -> Vec<u8> {
    let mut bytes = (topic.len() as i16).to_be_bytes().to_vec();
    bytes.extend_from_slice(topic.as_bytes());
    bytes
}

fn occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

// two partitions of one topic always collapse into a single topic
// entry, whatever order the shuffle picked
#[tokio::test]
async fn single_topic_fetches_stay_one_entry() {
    for _ in 0..20 {
        let mut script = testsupport::negotiation();
        script.push(Reply::Frame(testsupport::fetch_empty()));
        let spy = SpyConnection::new(script);

        let broker = Broker::new(spy.clone());
        broker
            .fetch(
                FetchOptions::default(),
                vec![FetchTopic {
                    topic: String::from("purchases"),
                    partitions: vec![
                        FetchPartition {
                            partition: 0,
                            fetch_offset: 0,
                            max_bytes: 1024,
                            ..FetchPartition::default()
                        },
                        FetchPartition {
                            partition: 1,
                            fetch_offset: 0,
                            max_bytes: 1024,
                            ..FetchPartition::default()
                        },
                    ],
                }],
            )
            .await
            .unwrap();

        let request = spy
            .requests()
            .into_iter()
            .find(|r| request_api_key(r) == FETCH)
            .unwrap();

        // exactly one topic entry, holding both partitions
        assert_eq!(occurrences(&request, &needle("purchases")), 1);
        let partition_0 = 0i32.to_be_bytes();
        let partition_1 = 1i32.to_be_bytes();
        let after_topic = request
            .windows(needle("purchases").len())
            .position(|w| w == needle("purchases"))
            .unwrap();
        let tail = &request[after_topic..];
        assert!(occurrences(tail, &partition_0) >= 1);
        assert!(occurrences(tail, &partition_1) >= 1);
    }
}

// negotiated fetch v11 requests carry the session defaults and the
// empty rack id
#[tokio::test]
async fn fetch_v11_carries_session_defaults() {
    let mut script = testsupport::negotiation();
    script.push(Reply::Frame(testsupport::fetch_empty()));
    let spy = SpyConnection::new(script);

    let broker = Broker::new(spy.clone());
    broker
        .fetch(
            FetchOptions::default(),
            vec![FetchTopic {
                topic: String::from("t"),
                partitions: vec![FetchPartition::default()],
            }],
        )
        .await
        .unwrap();

    let request = spy
        .requests()
        .into_iter()
        .find(|r| request_api_key(r) == FETCH)
        .unwrap();

    assert_eq!(testsupport::request_api_version(&request), 11);
    // rack id "" is the trailing empty string
    assert_eq!(&request[request.len() - 2..], [0, 0]);
}
