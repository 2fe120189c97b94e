//! Encoding and creation for Describe Groups requests.
//!
//! ### Protocol Def
//! ```text
//! DescribeGroups Request (Version: 0-1) => [groups]
//!   groups => STRING
//! ```

use crate::{
    encode::{AsStrings, ToByte},
    protocol::{api_keys, HeaderRequest},
};

/// The base Describe Groups request object.
#[derive(Debug)]
pub struct DescribeGroupsRequest<'a, T> {
    pub header: HeaderRequest<'a>,
    /// The names of the groups to describe.
    pub groups: &'a [T],
}

impl<'a, T: AsRef<str>> DescribeGroupsRequest<'a, T> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        groups: &'a [T],
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::DESCRIBE_GROUPS,
            api_version,
            correlation_id,
            client_id,
        );
        Self { header, groups }
    }
}

impl<'a, T: AsRef<str> + std::fmt::Debug + 'a> ToByte for DescribeGroupsRequest<'a, T> {
    fn encode<W: bytes::BufMut>(&self, buffer: &mut W) -> crate::error::Result<()> {
        tracing::trace!("Encoding DescribeGroupsRequest {:?}", self);
        self.header.encode(buffer)?;
        AsStrings(self.groups).encode(buffer)?;
        Ok(())
    }
}
