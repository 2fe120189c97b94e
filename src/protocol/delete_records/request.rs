//! Encoding and creation for Delete Records requests.
//!
//! ### Protocol Def
//! ```text
//! DeleteRecords Request (Version: 0) => [topics] timeout_ms
//!   topics => name [partitions]
//!     name => STRING
//!     partitions => partition_index offset
//!       partition_index => INT32
//!       offset => INT64
//!   timeout_ms => INT32
//! ```

use crate::{
    encode::ToByte,
    protocol::{api_keys, HeaderRequest},
};

/// The base Delete Records request object.
#[derive(Debug)]
pub struct DeleteRecordsRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// Each topic that we want to delete records from.
    pub topics: Vec<Topic<'a>>,
    /// How long to wait for the deletion to complete, in milliseconds.
    pub timeout_ms: i32,
}

/// Each topic that we want to delete records from.
#[derive(Debug)]
pub struct Topic<'a> {
    /// The topic name.
    pub name: &'a str,
    /// Each partition that we want to delete records from.
    pub partitions: Vec<Partition>,
}

/// Each partition that we want to delete records from.
#[derive(Debug)]
pub struct Partition {
    /// The partition index.
    pub partition_index: i32,
    /// The deletion offset; everything below it goes away.
    pub offset: i64,
}

impl<'a> DeleteRecordsRequest<'a> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        timeout_ms: i32,
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::DELETE_RECORDS,
            api_version,
            correlation_id,
            client_id,
        );
        Self {
            header,
            topics: vec![],
            timeout_ms,
        }
    }

    pub fn add(&mut self, topic_name: &'a str, partition_index: i32, offset: i64) {
        match self
            .topics
            .iter_mut()
            .find(|topic| topic.name == topic_name)
        {
            None => self.topics.push(Topic {
                name: topic_name,
                partitions: vec![Partition {
                    partition_index,
                    offset,
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
                        offset,
                    })
                }
            }
        }
    }
}

impl<'a> ToByte for DeleteRecordsRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding DeleteRecordsRequest {:?}", self);
        self.header.encode(buffer)?;
        self.topics.encode(buffer)?;
        self.timeout_ms.encode(buffer)?;
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

impl ToByte for Partition {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        self.partition_index.encode(buffer)?;
        self.offset.encode(buffer)?;
        Ok(())
    }
}
