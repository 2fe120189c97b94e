//! Encoding and creation for Add Partitions To Txn requests.
//!
//! ### Protocol Def
//! ```text
//! AddPartitionsToTxn Request (Version: 0-1) => transactional_id producer_id producer_epoch [topics]
//!   transactional_id => STRING
//!   producer_id => INT64
//!   producer_epoch => INT16
//!   topics => name [partitions]
//!     name => STRING
//!     partitions => INT32
//! ```

use crate::{
    encode::ToByte,
    protocol::{api_keys, HeaderRequest},
};

/// The base Add Partitions To Txn request object.
#[derive(Debug)]
pub struct AddPartitionsToTxnRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// The transactional id corresponding to the transaction.
    pub transactional_id: &'a str,
    /// Current producer id in use by the transactional id.
    pub producer_id: i64,
    /// Current epoch associated with the producer id.
    pub producer_epoch: i16,
    /// The partitions to add to the transaction.
    pub topics: Vec<Topic<'a>>,
}

/// The partitions to add to the transaction.
#[derive(Debug)]
pub struct Topic<'a> {
    /// The name of the topic.
    pub name: &'a str,
    /// The partition indexes to add to the transaction.
    pub partitions: Vec<i32>,
}

impl<'a> AddPartitionsToTxnRequest<'a> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        transactional_id: &'a str,
        producer_id: i64,
        producer_epoch: i16,
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::ADD_PARTITIONS_TO_TXN,
            api_version,
            correlation_id,
            client_id,
        );
        Self {
            header,
            transactional_id,
            producer_id,
            producer_epoch,
            topics: vec![],
        }
    }

    pub fn add(&mut self, topic_name: &'a str, partition_index: i32) {
        match self
            .topics
            .iter_mut()
            .find(|topic| topic.name == topic_name)
        {
            None => self.topics.push(Topic {
                name: topic_name,
                partitions: vec![partition_index],
            }),
            Some(topic) => {
                if !topic.partitions.contains(&partition_index) {
                    topic.partitions.push(partition_index)
                }
            }
        }
    }
}

impl<'a> ToByte for AddPartitionsToTxnRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding AddPartitionsToTxnRequest {:?}", self);
        self.header.encode(buffer)?;
        self.transactional_id.encode(buffer)?;
        self.producer_id.encode(buffer)?;
        self.producer_epoch.encode(buffer)?;
        self.topics.encode(buffer)?;
        Ok(())
    }
}

impl<'a> ToByte for Topic<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        self.name.encode(buffer)?;
        self.partitions.encode(buffer)?;
        Ok(())
    }
}
