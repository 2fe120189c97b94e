//! Encoding and creation for Create Topics requests.
//!
//! ### Protocol Def
//! ```text
//! CreateTopics Request (Version: 0) => [topics] timeout_ms
//! CreateTopics Request (Version: 1) => [topics] timeout_ms validate_only
//!   topics => name num_partitions replication_factor [assignments] [configs]
//!     name => STRING
//!     num_partitions => INT32
//!     replication_factor => INT16
//!     assignments => partition_index [broker_ids]
//!       partition_index => INT32
//!       broker_ids => INT32
//!     configs => name value
//!       name => STRING
//!       value => NULLABLE_STRING
//!   timeout_ms => INT32
//!   validate_only => BOOLEAN
//! ```

use crate::{
    encode::ToByte,
    protocol::{api_keys, HeaderRequest},
};

/// The base Create Topics request object.
#[derive(Debug)]
pub struct CreateTopicsRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// The topics to create.
    pub topics: Vec<Topic<'a>>,
    /// How long to wait in milliseconds before timing out the request.
    pub timeout_ms: i32,
    /// If true, check that the topics can be created as specified, but don't create anything. Version 1+.
    pub validate_only: bool,
}

/// The topics to create.
#[derive(Debug)]
pub struct Topic<'a> {
    /// The topic name.
    pub name: &'a str,
    /// The number of partitions to create in the topic, or -1 if we are specifying a manual partition assignment.
    pub num_partitions: i32,
    /// The number of replicas to create for each partition in the topic, or -1 if we are specifying a manual partition assignment.
    pub replication_factor: i16,
    /// The manual partition assignment, or the empty array if we are using automatic assignment.
    pub assignments: Vec<Assignment>,
    /// The custom topic configurations to set.
    pub configs: Vec<Config<'a>>,
}

/// The manual partition assignment.
#[derive(Debug)]
pub struct Assignment {
    /// The partition index.
    pub partition_index: i32,
    /// The brokers to place the partition on.
    pub broker_ids: Vec<i32>,
}

/// The custom topic configurations to set.
#[derive(Debug)]
pub struct Config<'a> {
    /// The configuration name.
    pub name: &'a str,
    /// The configuration value.
    pub value: Option<&'a str>,
}

impl<'a> CreateTopicsRequest<'a> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        timeout_ms: i32,
        validate_only: bool,
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::CREATE_TOPICS,
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

    pub fn add(&mut self, name: &'a str, num_partitions: i32, replication_factor: i16) {
        if !self.topics.iter().any(|topic| topic.name == name) {
            self.topics.push(Topic {
                name,
                num_partitions,
                replication_factor,
                assignments: vec![],
                configs: vec![],
            });
        }
    }
}

impl<'a> ToByte for CreateTopicsRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding CreateTopicsRequest {:?}", self);
        self.header.encode(buffer)?;
        self.topics.encode(buffer)?;
        self.timeout_ms.encode(buffer)?;
        if self.header.api_version >= 1 {
            self.validate_only.encode(buffer)?;
        }
        Ok(())
    }
}

impl<'a> ToByte for Topic<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        self.name.encode(buffer)?;
        self.num_partitions.encode(buffer)?;
        self.replication_factor.encode(buffer)?;
        self.assignments.encode(buffer)?;
        self.configs.encode(buffer)?;
        Ok(())
    }
}

impl ToByte for Assignment {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        self.partition_index.encode(buffer)?;
        self.broker_ids.encode(buffer)?;
        Ok(())
    }
}

impl<'a> ToByte for Config<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        self.name.encode(buffer)?;
        self.value.encode(buffer)?;
        Ok(())
    }
}
