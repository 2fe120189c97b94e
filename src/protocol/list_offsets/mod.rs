//! Look up offsets by timestamp.

pub mod request;
pub mod response;

pub const VERSIONS: &[i16] = &[1, 0];

#[cfg(test)]
mod test {
    use bytes::Bytes;

    use super::*;
    use crate::error::KafkaCode;

    #[test]
    fn v0_offsets_array_collapses_to_last_element() {
        let b = [
            0, 0, 0, 1, // correlation id
            0, 0, 0, 1, // one topic
            0, 1, 116, // "t"
            0, 0, 0, 1, // one partition
            0, 0, 0, 0, // partition index
            0, 0, // error code
            0, 0, 0, 3, // three offsets
            0, 0, 0, 0, 0, 0, 0, 10, //
            0, 0, 0, 0, 0, 0, 0, 7, //
            0, 0, 0, 0, 0, 0, 0, 3, //
        ];

        let res = response::ListOffsetsResponse::parse(Bytes::copy_from_slice(&b), 0).unwrap();
        let partition = &res.topics[0].partitions[0];
        assert_eq!(partition.error_code, KafkaCode::None);
        assert_eq!(partition.offset, 3);
    }

    #[test]
    fn v1_scalar_offset() {
        let b = [
            0, 0, 0, 1, // correlation id
            0, 0, 0, 1, // one topic
            0, 1, 116, // "t"
            0, 0, 0, 1, // one partition
            0, 0, 0, 0, // partition index
            0, 0, // error code
            255, 255, 255, 255, 255, 255, 255, 255, // timestamp -1
            0, 0, 0, 0, 0, 0, 0, 42, // offset
        ];

        let res = response::ListOffsetsResponse::parse(Bytes::copy_from_slice(&b), 1).unwrap();
        assert_eq!(res.topics[0].partitions[0].offset, 42);
        assert_eq!(res.topics[0].partitions[0].timestamp, -1);
    }
}
