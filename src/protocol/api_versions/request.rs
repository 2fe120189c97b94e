//! Encoding and creation for ApiVersions requests.
//!
//! ### Protocol Def
//! ```text
//! ApiVersions Request (Version: 0-2) =>
//!
//! ApiVersions Request (Version: 3) => client_software_name client_software_version TAG_BUFFER
//!   client_software_name => COMPACT_STRING
//!   client_software_version => COMPACT_STRING
//! ```
//!
//! Versions 0 through 2 have an empty body. Version 3 switched to the
//! flexible encoding (KIP-482) and identifies the client software
//! (KIP-511); its request header also grows a tagged-field section.

use bytes::BufMut;

use crate::{
    encode::{CompactStr, TaggedFields, ToByte},
    error::Result,
    protocol::{api_keys, HeaderRequest},
};

pub(crate) const CLIENT_SOFTWARE_NAME: &str = env!("CARGO_PKG_NAME");
pub(crate) const CLIENT_SOFTWARE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The base ApiVersions request object.
#[derive(Debug)]
pub struct ApiVersionsRequest<'a> {
    pub header: HeaderRequest<'a>,
}

impl<'a> ApiVersionsRequest<'a> {
    pub fn new(api_version: i16, correlation_id: i32, client_id: &'a str) -> Self {
        Self {
            header: HeaderRequest::new(
                api_keys::API_VERSIONS,
                api_version,
                correlation_id,
                client_id,
            ),
        }
    }
}

impl<'a> ToByte for ApiVersionsRequest<'a> {
    fn encode<W: BufMut>(&self, buffer: &mut W) -> Result<()> {
        tracing::trace!("Encoding ApiVersionsRequest {:?}", self);
        self.header.encode(buffer)?;

        if self.header.api_version >= 3 {
            // flexible header carries a tagged-field section after client id
            TaggedFields.encode(buffer)?;
            CompactStr(CLIENT_SOFTWARE_NAME).encode(buffer)?;
            CompactStr(CLIENT_SOFTWARE_VERSION).encode(buffer)?;
            TaggedFields.encode(buffer)?;
        }

        Ok(())
    }
}
