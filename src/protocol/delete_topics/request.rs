//! Encoding and creation for Delete Topics requests.
//!
//! ### Protocol Def
//! ```text
//! DeleteTopics Request (Version: 0-1) => [topic_names] timeout_ms
//!   topic_names => STRING
//!   timeout_ms => INT32
//! ```

use crate::{
    encode::{AsStrings, ToByte},
    protocol::{api_keys, HeaderRequest},
};

/// The base Delete Topics request object.
#[derive(Debug)]
pub struct DeleteTopicsRequest<'a, T> {
    pub header: HeaderRequest<'a>,
    /// The names of the topics to delete.
    pub topic_names: &'a [T],
    /// The length of time in milliseconds to wait for the deletions to complete.
    pub timeout_ms: i32,
}

impl<'a, T: AsRef<str>> DeleteTopicsRequest<'a, T> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        topic_names: &'a [T],
        timeout_ms: i32,
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::DELETE_TOPICS,
            api_version,
            correlation_id,
            client_id,
        );
        Self {
            header,
            topic_names,
            timeout_ms,
        }
    }
}

impl<'a, T: AsRef<str> + std::fmt::Debug + 'a> ToByte for DeleteTopicsRequest<'a, T> {
    fn encode<W: bytes::BufMut>(&self, buffer: &mut W) -> crate::error::Result<()> {
        tracing::trace!("Encoding DeleteTopicsRequest {:?}", self);
        self.header.encode(buffer)?;
        AsStrings(self.topic_names).encode(buffer)?;
        self.timeout_ms.encode(buffer)?;
        Ok(())
    }
}
