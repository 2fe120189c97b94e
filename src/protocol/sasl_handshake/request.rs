//! Encoding and creation for SASL Handshake requests.
//!
//! ### Protocol Def
//! ```text
//! SaslHandshake Request (Version: 0-1) => mechanism
//!   mechanism => STRING
//! ```
//!
//! The body is identical in both versions; the version only switches the
//! token framing that follows the handshake.

use crate::{encode::ToByte, protocol::{api_keys, HeaderRequest}};

/// The base SASL Handshake request object.
#[derive(Debug)]
pub struct SaslHandshakeRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// The SASL mechanism chosen by the client.
    pub mechanism: String,
}

impl<'a> SaslHandshakeRequest<'a> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        mechanism: String,
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::SASL_HANDSHAKE,
            api_version,
            correlation_id,
            client_id,
        );
        Self { header, mechanism }
    }
}

impl<'a> ToByte for SaslHandshakeRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding SaslHandshakeRequest {:?}", self);
        self.header.encode(buffer)?;
        self.mechanism.encode(buffer)?;
        Ok(())
    }
}
