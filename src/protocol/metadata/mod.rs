//! Topic & cluster metadata.

pub mod request;
pub mod response;

pub const VERSIONS: &[i16] = &[4, 0];

#[cfg(test)]
mod test {
    use super::*;
    use crate::{encode::ToByte, error::KafkaCode};
    use bytes::Bytes;

    #[test]
    fn encode_v0() {
        let topics = vec![String::from("purchases")];
        let req = request::MetadataRequest::new(0, 1, "rust", &topics, true);
        let mut buf = vec![];
        req.encode(&mut buf).unwrap();

        assert_eq!(
            buf,
            [
                0, 3, 0, 0, 0, 0, 0, 1, 0, 4, 114, 117, 115, 116, // header
                0, 0, 0, 1, 0, 9, 112, 117, 114, 99, 104, 97, 115, 101, 115,
            ]
        );
    }

    #[test]
    fn encode_v4_trailing_flag() {
        let topics: Vec<String> = vec![];
        let req = request::MetadataRequest::new(4, 1, "rust", &topics, false);
        let mut buf = vec![];
        req.encode(&mut buf).unwrap();

        assert_eq!(buf.last(), Some(&0u8));
        let req = request::MetadataRequest::new(4, 1, "rust", &topics, true);
        let mut buf = vec![];
        req.encode(&mut buf).unwrap();
        assert_eq!(buf.last(), Some(&1u8));
    }

    #[test]
    fn parse_v0() {
        let b = [
            0, 0, 0, 1, // correlation id
            0, 0, 0, 1, // one broker
            0, 0, 0, 1, // node id
            0, 9, 108, 111, 99, 97, 108, 104, 111, 115, 116, // "localhost"
            0, 0, 35, 132, // port 9092
            0, 0, 0, 1, // one topic
            0, 0, // error code
            0, 1, 116, // "t"
            0, 0, 0, 1, // one partition
            0, 0, // error code
            0, 0, 0, 0, // index
            0, 0, 0, 1, // leader
            0, 0, 0, 1, 0, 0, 0, 1, // replicas [1]
            0, 0, 0, 1, 0, 0, 0, 1, // isr [1]
        ];

        let res = response::MetadataResponse::parse(Bytes::copy_from_slice(&b), 0).unwrap();
        assert_eq!(res.brokers.len(), 1);
        assert_eq!(res.brokers[0].port, 9092);
        assert_eq!(res.controller_id, -1);
        assert_eq!(res.topics[0].error_code, KafkaCode::None);
        assert_eq!(res.topics[0].partitions[0].leader_id, 1);
    }
}
