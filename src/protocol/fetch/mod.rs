//! Fetch messages from a broker.

pub mod request;
pub mod response;

pub const VERSIONS: &[i16] = &[11, 4];

#[cfg(test)]
mod test {
    use super::*;
    use crate::encode::ToByte;

    #[test]
    fn encode_v4() {
        let b = [
            0, 1, 0, 4, 0, 0, 0, 1, 0, 4, 114, 117, 115, 116, 255, 255, 255, 255, 0, 0, 7, 208, 0,
            0, 0, 100, 0, 0, 117, 48, 0, 0, 0, 0, 1, 0, 9, 112, 117, 114, 99, 104, 97, 115, 101,
            115, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 117, 48, 0, 0, 117, 48,
        ];

        let mut req = request::FetchRequest::new(4, 1, "rust", 2000, 100, 30000, 0);
        req.add("purchases", 1, 30000, -1, -1, 30000);

        let mut buf = vec![];
        req.encode(&mut buf).unwrap();
        assert_eq!(buf, b);
    }

    #[test]
    fn encode_v11_session_fields() {
        let mut req = request::FetchRequest::new(11, 1, "rust", 2000, 100, 30000, 1);
        req.add("purchases", 0, 0, -1, -1, 1024);

        let mut buf = vec![];
        req.encode(&mut buf).unwrap();

        // session id 0 and session epoch -1 follow the isolation level
        let isolation_at = 14 + 4 * 4;
        assert_eq!(buf[isolation_at], 1);
        assert_eq!(&buf[isolation_at + 1..isolation_at + 5], [0, 0, 0, 0]);
        assert_eq!(
            &buf[isolation_at + 5..isolation_at + 9],
            [255, 255, 255, 255]
        );
        // empty rack id string at the tail
        assert_eq!(&buf[buf.len() - 2..], [0, 0]);
    }
}
