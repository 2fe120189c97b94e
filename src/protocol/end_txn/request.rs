//! Encoding and creation for End Txn requests.
//!
//! ### Protocol Def
//! ```text
//! EndTxn Request (Version: 0-1) => transactional_id producer_id producer_epoch committed
//!   transactional_id => STRING
//!   producer_id => INT64
//!   producer_epoch => INT16
//!   committed => BOOLEAN
//! ```

use crate::{
    encode::ToByte,
    protocol::{api_keys, HeaderRequest},
};

/// The base End Txn request object.
#[derive(Debug)]
pub struct EndTxnRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// The ID of the transaction to end.
    pub transactional_id: &'a str,
    /// The producer ID.
    pub producer_id: i64,
    /// The current epoch associated with the producer.
    pub producer_epoch: i16,
    /// True if the transaction was committed, false if it was aborted.
    pub committed: bool,
}

impl<'a> EndTxnRequest<'a> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        transactional_id: &'a str,
        producer_id: i64,
        producer_epoch: i16,
        committed: bool,
    ) -> Self {
        let header =
            HeaderRequest::new(api_keys::END_TXN, api_version, correlation_id, client_id);
        Self {
            header,
            transactional_id,
            producer_id,
            producer_epoch,
            committed,
        }
    }
}

impl<'a> ToByte for EndTxnRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding EndTxnRequest {:?}", self);
        self.header.encode(buffer)?;
        self.transactional_id.encode(buffer)?;
        self.producer_id.encode(buffer)?;
        self.producer_epoch.encode(buffer)?;
        self.committed.encode(buffer)?;
        Ok(())
    }
}
