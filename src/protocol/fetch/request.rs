//! Encoding and creation for Fetch requests.
//!
//! ### Protocol Def
//! ```text
//! Fetch Request (Version: 4) => replica_id max_wait_ms min_bytes max_bytes isolation_level [topics]
//!   replica_id => INT32
//!   max_wait_ms => INT32
//!   min_bytes => INT32
//!   max_bytes => INT32
//!   isolation_level => INT8
//!   topics => topic [partitions]
//!     topic => STRING
//!     partitions => partition fetch_offset partition_max_bytes
//!       partition => INT32
//!       fetch_offset => INT64
//!       partition_max_bytes => INT32
//!
//! Fetch Request (Version: 11) => replica_id max_wait_ms min_bytes max_bytes isolation_level session_id session_epoch [topics] [forgotten_topics_data] rack_id
//!   session_id => INT32
//!   session_epoch => INT32
//!   topics => topic [partitions]
//!     partitions => partition current_leader_epoch fetch_offset log_start_offset partition_max_bytes
//!   forgotten_topics_data => topic [partitions]
//!   rack_id => STRING
//! ```

use bytes::BufMut;

use crate::{
    encode::ToByte,
    error::Result,
    protocol::{api_keys, HeaderRequest},
};

#[derive(Debug, Clone)]
pub struct FetchRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// The broker ID of the follower, of -1 if this request is from a consumer.
    pub replica: i32,
    /// The maximum time in milliseconds to wait for the response.
    pub max_wait_ms: i32,
    /// The minimum bytes to accumulate in the response.
    pub min_bytes: i32,
    /// The maximum bytes to fetch. See KIP-74 for cases where this limit may not be honored.
    pub max_bytes: i32,
    /// This setting controls the visibility of transactional records. Using READ_UNCOMMITTED (isolation_level = 0) makes all records visible. With READ_COMMITTED (isolation_level = 1), non-transactional and COMMITTED transactional records are visible.
    pub isolation_level: i8,
    /// The fetch session ID (KIP-227). Version 7+.
    pub session_id: i32,
    /// The fetch session epoch, used for ordering requests in a session. Version 7+.
    pub session_epoch: i32,
    /// The topics to fetch.
    pub topics: Vec<TopicPartition<'a>>,
    /// In an incremental fetch request, the partitions to remove. Version 7+.
    pub forgotten_topics: Vec<ForgottenTopic<'a>>,
    /// The consumer's rack ID. Version 11+.
    pub rack_id: &'a str,
}

/// The topics to fetch.
#[derive(Debug, Clone)]
pub struct TopicPartition<'a> {
    /// The name of the topic to fetch.
    pub topic_name: &'a str,
    /// The partitions to fetch.
    pub partitions: Vec<Partition>,
}

/// The partitions to fetch.
#[derive(Debug, Clone)]
pub struct Partition {
    /// The partition index.
    pub partition_index: i32,
    /// The current leader epoch of the partition, or -1 when unknown. Version 9+.
    pub current_leader_epoch: i32,
    /// The message offset.
    pub offset: i64,
    /// The earliest available offset of the follower replica, or -1 for consumers. Version 5+.
    pub log_start_offset: i64,
    /// The maximum bytes to fetch from this partition. See KIP-74 for cases where this limit may not be honored.
    pub max_bytes: i32,
}

/// In an incremental fetch request, the partitions to remove.
#[derive(Debug, Clone)]
pub struct ForgottenTopic<'a> {
    pub topic_name: &'a str,
    pub partitions: Vec<i32>,
}

impl<'a> FetchRequest<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        max_wait_ms: i32,
        min_bytes: i32,
        max_bytes: i32,
        isolation_level: i8,
    ) -> FetchRequest<'a> {
        FetchRequest {
            header: HeaderRequest::new(api_keys::FETCH, api_version, correlation_id, client_id),
            replica: -1,
            max_wait_ms,
            min_bytes,
            max_bytes,
            isolation_level,
            session_id: 0,
            session_epoch: -1,
            topics: vec![],
            forgotten_topics: vec![],
            rack_id: "",
        }
    }

    pub fn add(
        &mut self,
        topic_name: &'a str,
        partition_index: i32,
        offset: i64,
        current_leader_epoch: i32,
        log_start_offset: i64,
        max_bytes: i32,
    ) {
        match self
            .topics
            .iter_mut()
            .find(|topic| topic.topic_name == topic_name)
        {
            None => self.topics.push(TopicPartition {
                topic_name,
                partitions: vec![Partition {
                    partition_index,
                    current_leader_epoch,
                    offset,
                    log_start_offset,
                    max_bytes,
                }],
            }),
            Some(topic) => {
                if !topic
                    .partitions
                    .iter_mut()
                    .any(|partition| partition.partition_index == partition_index)
                {
                    topic.partitions.push(Partition {
                        partition_index,
                        current_leader_epoch,
                        offset,
                        log_start_offset,
                        max_bytes,
                    })
                }
            }
        }
    }

    /// Append a topic entry as-is, without merging it into an earlier
    /// entry for the same topic. The broker layer uses this to preserve
    /// its shuffled ordering.
    pub fn push_topic(&mut self, topic: TopicPartition<'a>) {
        self.topics.push(topic);
    }
}

impl<'a> ToByte for FetchRequest<'a> {
    fn encode<W: BufMut>(&self, buffer: &mut W) -> Result<()> {
        tracing::trace!("Encoding FetchRequest {:?}", self);
        let version = self.header.api_version;

        self.header.encode(buffer)?;
        self.replica.encode(buffer)?;
        self.max_wait_ms.encode(buffer)?;
        self.min_bytes.encode(buffer)?;
        self.max_bytes.encode(buffer)?;
        self.isolation_level.encode(buffer)?;
        if version >= 7 {
            self.session_id.encode(buffer)?;
            self.session_epoch.encode(buffer)?;
        }
        crate::encode::encode_as_array(buffer, &self.topics, |buffer, topic| {
            topic.topic_name.encode(buffer)?;
            crate::encode::encode_as_array(buffer, &topic.partitions, |buffer, p| {
                p.partition_index.encode(buffer)?;
                if version >= 9 {
                    p.current_leader_epoch.encode(buffer)?;
                }
                p.offset.encode(buffer)?;
                if version >= 5 {
                    p.log_start_offset.encode(buffer)?;
                }
                p.max_bytes.encode(buffer)
            })
        })?;
        if version >= 7 {
            self.forgotten_topics.encode(buffer)?;
        }
        if version >= 11 {
            self.rack_id.encode(buffer)?;
        }
        Ok(())
    }
}

impl<'a> ToByte for ForgottenTopic<'a> {
    fn encode<W: BufMut>(&self, buffer: &mut W) -> Result<()> {
        self.topic_name.encode(buffer)?;
        self.partitions.encode(buffer)?;
        Ok(())
    }
}
