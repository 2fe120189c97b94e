//! Encoding and creation for Delete Groups requests.
//!
//! ### Protocol Def
//! ```text
//! DeleteGroups Request (Version: 0-1) => [groups_names]
//!   groups_names => STRING
//! ```

use crate::{
    encode::{AsStrings, ToByte},
    protocol::{api_keys, HeaderRequest},
};

/// The base Delete Groups request object.
#[derive(Debug)]
pub struct DeleteGroupsRequest<'a, T> {
    pub header: HeaderRequest<'a>,
    /// The group names to delete.
    pub groups: &'a [T],
}

impl<'a, T: AsRef<str>> DeleteGroupsRequest<'a, T> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        groups: &'a [T],
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::DELETE_GROUPS,
            api_version,
            correlation_id,
            client_id,
        );
        Self { header, groups }
    }
}

impl<'a, T: AsRef<str> + std::fmt::Debug + 'a> ToByte for DeleteGroupsRequest<'a, T> {
    fn encode<W: bytes::BufMut>(&self, buffer: &mut W) -> crate::error::Result<()> {
        tracing::trace!("Encoding DeleteGroupsRequest {:?}", self);
        self.header.encode(buffer)?;
        AsStrings(self.groups).encode(buffer)?;
        Ok(())
    }
}
