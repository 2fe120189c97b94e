//! Encoding and creation for SASL Authenticate requests.
//!
//! ### Protocol Def
//! ```text
//! SaslAuthenticate Request (Version: 0-1) => auth_bytes
//!   auth_bytes => BYTES
//! ```

use bytes::Bytes;

use crate::{encode::ToByte, protocol::{api_keys, HeaderRequest}};

/// The base SASL Authenticate request object.
#[derive(Debug)]
pub struct SaslAuthenticateRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// The SASL authentication bytes from the client, as defined by the SASL mechanism.
    pub auth_bytes: Bytes,
}

impl<'a> SaslAuthenticateRequest<'a> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        auth_bytes: Bytes,
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::SASL_AUTHENTICATE,
            api_version,
            correlation_id,
            client_id,
        );
        Self { header, auth_bytes }
    }
}

impl<'a> ToByte for SaslAuthenticateRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding SaslAuthenticateRequest");
        self.header.encode(buffer)?;
        self.auth_bytes.encode(buffer)?;
        Ok(())
    }
}
