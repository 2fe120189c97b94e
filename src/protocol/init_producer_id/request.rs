//! Encoding and creation for Init Producer Id requests.
//!
//! ### Protocol Def
//! ```text
//! InitProducerId Request (Version: 0-1) => transactional_id transaction_timeout_ms
//!   transactional_id => NULLABLE_STRING
//!   transaction_timeout_ms => INT32
//! ```

use crate::{
    encode::ToByte,
    protocol::{api_keys, HeaderRequest},
};

/// The base Init Producer Id request object.
#[derive(Debug)]
pub struct InitProducerIdRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// The transactional id, or null if the producer is not transactional.
    pub transactional_id: Option<&'a str>,
    /// The time in ms to wait before aborting idle transactions sent by this producer. Only relevant when a transactional id is set.
    pub transaction_timeout_ms: i32,
}

impl<'a> InitProducerIdRequest<'a> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        transactional_id: Option<&'a str>,
        transaction_timeout_ms: i32,
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::INIT_PRODUCER_ID,
            api_version,
            correlation_id,
            client_id,
        );
        Self {
            header,
            transactional_id,
            transaction_timeout_ms,
        }
    }
}

impl<'a> ToByte for InitProducerIdRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding InitProducerIdRequest {:?}", self);
        self.header.encode(buffer)?;
        self.transactional_id.encode(buffer)?;
        self.transaction_timeout_ms.encode(buffer)?;
        Ok(())
    }
}
