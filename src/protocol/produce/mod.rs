//! Send messages to a broker.

pub mod request;
pub mod response;

pub const VERSIONS: &[i16] = &[3];

#[cfg(test)]
mod test {
    use bytes::Bytes;

    use super::request::{Compression, Message, ProduceRequest};
    use crate::encode::ToByte;

    #[test]
    fn encode_required_fields() {
        let mut req = ProduceRequest::new(3, 1, "rust", -1, 30000, Compression::None, None, -1, 0);
        req.add(
            "purchases",
            0,
            Message::new(None, Some(Bytes::from_static(b"v")), vec![]),
        );

        let mut buf = vec![];
        req.encode(&mut buf).unwrap();

        // header + null transactional id + acks
        assert_eq!(
            &buf[..18],
            [0, 0, 0, 3, 0, 0, 0, 1, 0, 4, 114, 117, 115, 116, 255, 255, 255, 255]
        );
        // one topic, one partition
        assert_eq!(&buf[22..26], [0, 0, 0, 1]);
    }

    #[test]
    fn batch_grows_with_messages() {
        let mut req = ProduceRequest::new(3, 1, "rust", -1, 30000, Compression::None, None, -1, 0);
        req.add("t", 0, Message::new(None, Some(Bytes::from_static(b"a")), vec![]));
        req.add("t", 0, Message::new(None, Some(Bytes::from_static(b"b")), vec![]));
        req.add("t", 1, Message::new(None, Some(Bytes::from_static(b"c")), vec![]));

        let mut buf = vec![];
        req.encode(&mut buf).unwrap();
        assert!(!buf.is_empty());
    }
}
