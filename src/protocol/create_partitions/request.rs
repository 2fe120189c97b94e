//! Encoding and creation for Create Partitions requests.
//!
//! ### Protocol Def
//! ```text
//! CreatePartitions Request (Version: 0) => [topics] timeout_ms validate_only
//!   topics => name count [assignments]
//!     name => STRING
//!     count => INT32
//!     assignments => [broker_ids]
//!       broker_ids => INT32
//!   timeout_ms => INT32
//!   validate_only => BOOLEAN
//! ```

use crate::{
    encode::{encode_as_array, ToByte},
    protocol::{api_keys, HeaderRequest},
};

/// The base Create Partitions request object.
#[derive(Debug)]
pub struct CreatePartitionsRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// Each topic that we want to create new partitions inside.
    pub topics: Vec<Topic<'a>>,
    /// The time in ms to wait for the partitions to be created.
    pub timeout_ms: i32,
    /// If true, then validate the request, but don't actually increase the number of partitions.
    pub validate_only: bool,
}

/// Each topic that we want to create new partitions inside.
#[derive(Debug)]
pub struct Topic<'a> {
    /// The topic name.
    pub name: &'a str,
    /// The new partition count.
    pub count: i32,
    /// The new partition assignments, one broker list per added partition.
    pub assignments: Vec<Vec<i32>>,
}

impl<'a> CreatePartitionsRequest<'a> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        timeout_ms: i32,
        validate_only: bool,
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::CREATE_PARTITIONS,
            api_version,
            correlation_id,
            client_id,
        );
        Self {
            header,
            topics: vec![],
            timeout_ms,
            validate_only,
        }
    }

    pub fn add(&mut self, name: &'a str, count: i32) {
        if !self.topics.iter().any(|topic| topic.name == name) {
            self.topics.push(Topic {
                name,
                count,
                assignments: vec![],
            });
        }
    }
}

impl<'a> ToByte for CreatePartitionsRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding CreatePartitionsRequest {:?}", self);
        self.header.encode(buffer)?;
        encode_as_array(buffer, &self.topics, |buffer, topic| {
            topic.name.encode(buffer)?;
            topic.count.encode(buffer)?;
            // a null assignments array leaves placement to the broker
            if topic.assignments.is_empty() {
                (-1i32).encode(buffer)
            } else {
                encode_as_array(buffer, &topic.assignments, |buffer, brokers| {
                    brokers.as_slice().encode(buffer)
                })
            }
        })?;
        self.timeout_ms.encode(buffer)?;
        self.validate_only.encode(buffer)?;
        Ok(())
    }
}
