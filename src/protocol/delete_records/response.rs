//! Parsing and processing for Delete Records responses.
//!
//! ### Protocol Def
//! ```text
//! DeleteRecords Response (Version: 0) => throttle_time_ms [topics]
//!   throttle_time_ms => INT32
//!   topics => name [partitions]
//!     name => STRING
//!     partitions => partition_index low_watermark error_code
//!       partition_index => INT32
//!       low_watermark => INT64
//!       error_code => INT16
//! ```

use bytes::Bytes;
use nom::{
    number::complete::{be_i32, be_i64},
    IResult,
};
use nombytes::NomBytes;

use crate::{
    error::{Error, KafkaCode, Result},
    parser,
    protocol::{parse_header_response, HeaderResponse},
};

/// The base Delete Records response object.
#[derive(Debug, PartialEq)]
pub struct DeleteRecordsResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota.
    pub throttle_time_ms: i32,
    /// Each topic that we wanted to delete records from.
    pub topics: Vec<Topic>,
}

/// Each topic that we wanted to delete records from.
#[derive(Debug, PartialEq)]
pub struct Topic {
    /// The topic name.
    pub name: Bytes,
    /// Each partition that we wanted to delete records from.
    pub partitions: Vec<Partition>,
}

/// Each partition that we wanted to delete records from.
#[derive(Debug, PartialEq)]
pub struct Partition {
    /// The partition index.
    pub partition_index: i32,
    /// The partition low water mark.
    pub low_watermark: i64,
    /// The deletion error code, or 0 if the deletion succeeded.
    pub error_code: KafkaCode,
}

impl TryFrom<Bytes> for DeleteRecordsResponse {
    type Error = Error;

    fn try_from(s: Bytes) -> Result<Self> {
        tracing::trace!("Parsing DeleteRecordsResponse {:?}", s);
        let (_, response) =
            parse_delete_records_response(NomBytes::new(s.clone())).map_err(|err| {
                tracing::error!("ERROR: Failed parsing DeleteRecordsResponse {:?}", err);
                tracing::error!("ERROR: DeleteRecordsResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed DeleteRecordsResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_delete_records_response(s: NomBytes) -> IResult<NomBytes, DeleteRecordsResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = be_i32(s)?;
    let (s, topics) = parser::parse_array(parse_topic)(s)?;

    Ok((
        s,
        DeleteRecordsResponse {
            header,
            throttle_time_ms,
            topics,
        },
    ))
}

fn parse_topic(s: NomBytes) -> IResult<NomBytes, Topic> {
    let (s, name) = parser::parse_string(s)?;
    let (s, partitions) = parser::parse_array(parse_partition)(s)?;

    Ok((s, Topic { name, partitions }))
}

fn parse_partition(s: NomBytes) -> IResult<NomBytes, Partition> {
    let (s, partition_index) = be_i32(s)?;
    let (s, low_watermark) = be_i64(s)?;
    let (s, error_code) = parser::parse_kafka_code(s)?;

    Ok((
        s,
        Partition {
            partition_index,
            low_watermark,
            error_code,
        },
    ))
}
