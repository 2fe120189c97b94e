//! Discover the API version ranges a broker supports.
//!
//! This is the first request on every fresh connection. The broker answers
//! with one `{min, max}` range per API key; the client then pins every
//! subsequent request to the highest version both sides implement.

pub mod request;
pub mod response;

/// Wire versions this client can speak, highest first. The negotiator
/// walks this list downward until the broker stops answering
/// `UNSUPPORTED_VERSION`.
pub const VERSIONS: &[i16] = &[3, 2, 1, 0];

#[cfg(test)]
mod test {
    use bytes::Bytes;

    use super::*;
    use crate::{encode::ToByte, error::KafkaCode};

    #[test]
    fn encode_v0() {
        let req = request::ApiVersionsRequest::new(0, 1, "rust");
        let mut buf = vec![];
        req.encode(&mut buf).unwrap();

        // header only: api key 18, version 0, correlation id, client id
        assert_eq!(buf, [0, 18, 0, 0, 0, 0, 0, 1, 0, 4, 114, 117, 115, 116]);
    }

    #[test]
    fn encode_v3_is_flexible() {
        let req = request::ApiVersionsRequest::new(3, 1, "rust");
        let mut buf = vec![];
        req.encode(&mut buf).unwrap();

        let header = [0u8, 18, 0, 3, 0, 0, 0, 1, 0, 4, 114, 117, 115, 116, 0];
        assert_eq!(&buf[..header.len()], header);
        // compact software name/version follow, each varint length + 1
        assert_eq!(buf[header.len()] as usize, request::CLIENT_SOFTWARE_NAME.len() + 1);
    }

    #[test]
    fn parse_v0() {
        let b = [
            0, 0, 0, 1, // correlation id
            0, 0, // error code
            0, 0, 0, 2, // two keys
            0, 0, 0, 0, 0, 7, // produce: 0..7
            0, 18, 0, 0, 0, 2, // api versions: 0..2
        ];

        let res = response::ApiVersionsResponse::parse(Bytes::copy_from_slice(&b), 0).unwrap();
        assert_eq!(res.error_code, KafkaCode::None);
        assert_eq!(res.api_keys.len(), 2);
        assert_eq!(res.api_keys[1].api_key, 18);
        assert_eq!(res.api_keys[1].max_version, 2);
    }

    #[test]
    fn parse_error_short_circuits_body() {
        // brokers that reject the request version answer with a v0 body,
        // so nothing after the error code can be trusted
        let b = [
            0, 0, 0, 1, // correlation id
            0, 35, // UNSUPPORTED_VERSION
            0, 0, 0, 0, // empty v0 array
        ];

        let res = response::ApiVersionsResponse::parse(Bytes::copy_from_slice(&b), 3).unwrap();
        assert_eq!(res.error_code, KafkaCode::UnsupportedVersion);
        assert!(res.api_keys.is_empty());
    }

    #[test]
    fn parse_v3() {
        let b = [
            0, 0, 0, 1, // correlation id
            0, 0, // error code
            2, // compact array: 1 entry
            0, 1, 0, 4, 0, 11, 0, // fetch 4..11 + tagged fields
            0, 0, 0, 0, // throttle
            0, // tagged fields
        ];

        let res = response::ApiVersionsResponse::parse(Bytes::copy_from_slice(&b), 3).unwrap();
        assert_eq!(res.api_keys.len(), 1);
        assert_eq!(res.api_keys[0].api_key, 1);
        assert_eq!(res.api_keys[0].min_version, 4);
        assert_eq!(res.api_keys[0].max_version, 11);
        assert_eq!(res.throttle_time_ms, 0);
    }
}
