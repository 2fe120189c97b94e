//! Parsing and processing for Metadata responses.
//!
//! ### Protocol Def
//! ```text
//! Metadata Response (Version: 0) => [brokers] [topics]
//!   brokers => node_id host port
//!     node_id => INT32
//!     host => STRING
//!     port => INT32
//!   topics => error_code name [partitions]
//!     error_code => INT16
//!     name => STRING
//!     partitions => error_code partition_index leader_id [replica_nodes] [isr_nodes]
//!
//! Metadata Response (Version: 4) => throttle_time_ms [brokers] cluster_id controller_id [topics]
//!   brokers => node_id host port rack
//!   topics => error_code name is_internal [partitions]
//! ```

use bytes::Bytes;
use nom::{number::complete::be_i32, IResult};
use nombytes::NomBytes;

use crate::{
    error::{Error, KafkaCode, Result},
    parser,
    protocol::{parse_header_response, HeaderResponse},
};

/// The base Metadata response object.
#[derive(Debug, PartialEq)]
pub struct MetadataResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota. Version 3+.
    pub throttle_time_ms: i32,
    /// Each broker in the response.
    pub brokers: Vec<Broker>,
    /// The cluster ID that responding broker belongs to. Version 2+.
    pub cluster_id: Option<Bytes>,
    /// The ID of the controller broker, or -1 when unknown. Version 1+.
    pub controller_id: i32,
    /// Each topic in the response.
    pub topics: Vec<Topic>,
}

/// Each broker in the response.
#[derive(Debug, Clone, PartialEq)]
pub struct Broker {
    /// The broker ID.
    pub node_id: i32,
    /// The broker hostname.
    pub host: Bytes,
    /// The broker port.
    pub port: u16,
    /// The rack of the broker, or null if it has not been assigned to a rack. Version 1+.
    pub rack: Option<Bytes>,
}

impl Broker {
    pub fn addr(&self) -> Result<String> {
        let host = std::str::from_utf8(self.host.as_ref()).map_err(|err| {
            tracing::error!("Error converting from UTF8 {:?}", err);
            Error::DecodingUtf8Error
        })?;
        Ok(format!("{}:{}", host, self.port))
    }
}

/// Each topic in the response.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    /// The topic error, or 0 if there was no error.
    pub error_code: KafkaCode,
    /// The topic name.
    pub name: Bytes,
    /// Whether the topic is internal, such as `__consumer_offsets`. Version 1+.
    pub is_internal: bool,
    /// Each partition in the topic.
    pub partitions: Vec<Partition>,
}

/// Each partition in the topic.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// The partition error, or 0 if there was no error.
    pub error_code: KafkaCode,
    /// The partition index.
    pub partition_index: i32,
    /// The ID of the leader broker.
    pub leader_id: i32,
    /// The set of all nodes that host this partition.
    pub replica_nodes: Vec<i32>,
    /// The set of nodes that are in sync with the leader for this partition.
    pub isr_nodes: Vec<i32>,
}

impl MetadataResponse {
    pub fn parse(s: Bytes, api_version: i16) -> Result<Self> {
        tracing::trace!("Parsing MetadataResponse {:?}", s);
        let (_, response) = parse_metadata_response(NomBytes::new(s.clone()), api_version)
            .map_err(|err| {
                tracing::error!("ERROR: Failed parsing MetadataResponse {:?}", err);
                tracing::error!("ERROR: MetadataResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed MetadataResponse {:?}", response);
        Ok(response)
    }

    pub fn is_error(&self) -> Result<()> {
        for topic in self.topics.iter() {
            if topic.error_code != KafkaCode::None {
                return Err(Error::KafkaError(topic.error_code));
            }
            for partition in topic.partitions.iter() {
                if partition.error_code != KafkaCode::None {
                    return Err(Error::KafkaError(partition.error_code));
                }
            }
        }
        Ok(())
    }
}

pub fn parse_metadata_response(
    s: NomBytes,
    api_version: i16,
) -> IResult<NomBytes, MetadataResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = if api_version >= 3 { be_i32(s)? } else { (s, 0) };
    let (s, brokers) = parser::parse_array(move |b| parse_broker(b, api_version))(s)?;
    let (s, cluster_id) = if api_version >= 2 {
        parser::parse_nullable_string(s)?
    } else {
        (s, None)
    };
    let (s, controller_id) = if api_version >= 1 { be_i32(s)? } else { (s, -1) };
    let (s, topics) = parser::parse_array(move |t| parse_topic(t, api_version))(s)?;

    Ok((
        s,
        MetadataResponse {
            header,
            throttle_time_ms,
            brokers,
            cluster_id,
            controller_id,
            topics,
        },
    ))
}

fn parse_broker(s: NomBytes, api_version: i16) -> IResult<NomBytes, Broker> {
    let (s, node_id) = be_i32(s)?;
    let (s, host) = parser::parse_string(s)?;
    // port is an INT32 on the wire but never exceeds u16
    let (s, port) = be_i32(s)?;
    let port = port as u16;
    let (s, rack) = if api_version >= 1 {
        parser::parse_nullable_string(s)?
    } else {
        (s, None)
    };

    Ok((
        s,
        Broker {
            node_id,
            host,
            port,
            rack,
        },
    ))
}

fn parse_topic(s: NomBytes, api_version: i16) -> IResult<NomBytes, Topic> {
    let (s, error_code) = parser::parse_kafka_code(s)?;
    let (s, name) = parser::parse_string(s)?;
    let (s, is_internal) = if api_version >= 1 {
        parser::parse_boolean(s)?
    } else {
        (s, false)
    };
    let (s, partitions) = parser::parse_array(parse_partition)(s)?;

    Ok((
        s,
        Topic {
            error_code,
            name,
            is_internal,
            partitions,
        },
    ))
}

fn parse_partition(s: NomBytes) -> IResult<NomBytes, Partition> {
    let (s, error_code) = parser::parse_kafka_code(s)?;
    let (s, partition_index) = be_i32(s)?;
    let (s, leader_id) = be_i32(s)?;
    let (s, replica_nodes) = parser::parse_array(be_i32)(s)?;
    let (s, isr_nodes) = parser::parse_array(be_i32)(s)?;

    Ok((
        s,
        Partition {
            error_code,
            partition_index,
            leader_id,
            replica_nodes,
            isr_nodes,
        },
    ))
}
