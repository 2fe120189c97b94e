//! Encoding and creation for Metadata requests.
//!
//! ### Protocol Def
//! ```text
//! Metadata Request (Version: 0) => [topics]
//!   topics => name
//!   name => STRING
//!
//! Metadata Request (Version: 4) => [topics] allow_auto_topic_creation
//!   topics => name
//!   name => STRING
//!   allow_auto_topic_creation => BOOLEAN
//! ```

use bytes::BufMut;

use crate::{
    encode::{AsStrings, ToByte},
    error::Result,
    protocol::{api_keys, HeaderRequest},
};

/// The base Metadata request object.
#[derive(Debug)]
pub struct MetadataRequest<'a, T> {
    pub header: HeaderRequest<'a>,
    /// The topics to fetch metadata for.
    pub topics: &'a [T],
    /// If this is true, the broker may auto-create topics that we requested
    /// which do not already exist, if it is configured to do so. Version 4+.
    pub allow_auto_topic_creation: bool,
}

impl<'a, T: AsRef<str>> MetadataRequest<'a, T> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        topics: &'a [T],
        allow_auto_topic_creation: bool,
    ) -> MetadataRequest<'a, T> {
        MetadataRequest {
            header: HeaderRequest::new(api_keys::METADATA, api_version, correlation_id, client_id),
            topics,
            allow_auto_topic_creation,
        }
    }
}

impl<'a, T: AsRef<str> + std::fmt::Debug + 'a> ToByte for MetadataRequest<'a, T> {
    fn encode<W: BufMut>(&self, buffer: &mut W) -> Result<()> {
        tracing::trace!("Encoding MetadataRequest {:?}", self);
        self.header.encode(buffer)?;
        AsStrings(self.topics).encode(buffer)?;
        if self.header.api_version >= 4 {
            self.allow_auto_topic_creation.encode(buffer)?;
        }
        Ok(())
    }
}
