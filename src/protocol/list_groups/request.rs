//! Encoding and creation for List Groups requests.
//!
//! ### Protocol Def
//! ```text
//! ListGroups Request (Version: 0-1) =>
//! ```
//!
//! The request has no body.

use crate::{
    encode::ToByte,
    protocol::{api_keys, HeaderRequest},
};

/// The base List Groups request object.
#[derive(Debug)]
pub struct ListGroupsRequest<'a> {
    pub header: HeaderRequest<'a>,
}

impl<'a> ListGroupsRequest<'a> {
    pub fn new(api_version: i16, correlation_id: i32, client_id: &'a str) -> Self {
        let header = HeaderRequest::new(
            api_keys::LIST_GROUPS,
            api_version,
            correlation_id,
            client_id,
        );
        Self { header }
    }
}

impl<'a> ToByte for ListGroupsRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding ListGroupsRequest {:?}", self);
        self.header.encode(buffer)?;
        Ok(())
    }
}
