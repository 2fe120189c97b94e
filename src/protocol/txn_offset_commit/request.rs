//! Encoding and creation for Txn Offset Commit requests.
//!
//! ### Protocol Def
//! ```text
//! TxnOffsetCommit Request (Version: 0-1) => transactional_id group_id producer_id producer_epoch [topics]
//!   transactional_id => STRING
//!   group_id => STRING
//!   producer_id => INT64
//!   producer_epoch => INT16
//!   topics => name [partitions]
//!     name => STRING
//!     partitions => partition_index committed_offset committed_metadata
//!       partition_index => INT32
//!       committed_offset => INT64
//!       committed_metadata => NULLABLE_STRING
//! ```

use crate::{
    encode::ToByte,
    protocol::{api_keys, HeaderRequest},
};

/// The base Txn Offset Commit request object.
#[derive(Debug)]
pub struct TxnOffsetCommitRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// The ID of the transaction.
    pub transactional_id: &'a str,
    /// The ID of the group.
    pub group_id: &'a str,
    /// The current producer ID in use by the transactional ID.
    pub producer_id: i64,
    /// The current epoch associated with the producer ID.
    pub producer_epoch: i16,
    /// Each topic that we want to commit offsets for.
    pub topics: Vec<Topic<'a>>,
}

/// Each topic that we want to commit offsets for.
#[derive(Debug)]
pub struct Topic<'a> {
    /// The topic name.
    pub name: &'a str,
    /// The partitions inside the topic that we want to commit offsets for.
    pub partitions: Vec<Partition<'a>>,
}

/// The partitions inside the topic that we want to commit offsets for.
#[derive(Debug)]
pub struct Partition<'a> {
    /// The index of the partition within the topic.
    pub partition_index: i32,
    /// The message offset to be committed.
    pub committed_offset: i64,
    /// Any associated metadata the client wants to keep.
    pub committed_metadata: Option<&'a str>,
}

impl<'a> TxnOffsetCommitRequest<'a> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        transactional_id: &'a str,
        group_id: &'a str,
        producer_id: i64,
        producer_epoch: i16,
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::TXN_OFFSET_COMMIT,
            api_version,
            correlation_id,
            client_id,
        );
        Self {
            header,
            transactional_id,
            group_id,
            producer_id,
            producer_epoch,
            topics: vec![],
        }
    }

    pub fn add(
        &mut self,
        topic_name: &'a str,
        partition_index: i32,
        committed_offset: i64,
        committed_metadata: Option<&'a str>,
    ) {
        match self
            .topics
            .iter_mut()
            .find(|topic| topic.name == topic_name)
        {
            None => self.topics.push(Topic {
                name: topic_name,
                partitions: vec![Partition {
                    partition_index,
                    committed_offset,
                    committed_metadata,
                }],
            }),
            Some(topic) => {
                if !topic
                    .partitions
                    .iter()
                    .any(|partition| partition.partition_index == partition_index)
                {
                    topic.partitions.push(Partition {
                        partition_index,
                        committed_offset,
                        committed_metadata,
                    })
                }
            }
        }
    }
}

impl<'a> ToByte for TxnOffsetCommitRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding TxnOffsetCommitRequest {:?}", self);
        self.header.encode(buffer)?;
        self.transactional_id.encode(buffer)?;
        self.group_id.encode(buffer)?;
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

impl<'a> ToByte for Partition<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        self.partition_index.encode(buffer)?;
        self.committed_offset.encode(buffer)?;
        self.committed_metadata.encode(buffer)?;
        Ok(())
    }
}
