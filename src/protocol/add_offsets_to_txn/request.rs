//! Encoding and creation for Add Offsets To Txn requests.
//!
//! ### Protocol Def
//! ```text
//! AddOffsetsToTxn Request (Version: 0-1) => transactional_id producer_id producer_epoch group_id
//!   transactional_id => STRING
//!   producer_id => INT64
//!   producer_epoch => INT16
//!   group_id => STRING
//! ```

use crate::{
    encode::ToByte,
    protocol::{api_keys, HeaderRequest},
};

/// The base Add Offsets To Txn request object.
#[derive(Debug)]
pub struct AddOffsetsToTxnRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// The transactional id corresponding to the transaction.
    pub transactional_id: &'a str,
    /// Current producer id in use by the transactional id.
    pub producer_id: i64,
    /// Current epoch associated with the producer id.
    pub producer_epoch: i16,
    /// The unique group identifier.
    pub group_id: &'a str,
}

impl<'a> AddOffsetsToTxnRequest<'a> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        transactional_id: &'a str,
        producer_id: i64,
        producer_epoch: i16,
        group_id: &'a str,
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::ADD_OFFSETS_TO_TXN,
            api_version,
            correlation_id,
            client_id,
        );
        Self {
            header,
            transactional_id,
            producer_id,
            producer_epoch,
            group_id,
        }
    }
}

impl<'a> ToByte for AddOffsetsToTxnRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding AddOffsetsToTxnRequest {:?}", self);
        self.header.encode(buffer)?;
        self.transactional_id.encode(buffer)?;
        self.producer_id.encode(buffer)?;
        self.producer_epoch.encode(buffer)?;
        self.group_id.encode(buffer)?;
        Ok(())
    }
}
