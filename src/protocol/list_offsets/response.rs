//! Parsing and processing for List Offsets responses.
//!
//! ### Protocol Def
//! ```text
//! ListOffsets Response (Version: 0) => [topics]
//!   topics => name [partitions]
//!     name => STRING
//!     partitions => partition_index error_code [old_style_offsets]
//!
//! ListOffsets Response (Version: 1) => [topics]
//!   topics => name [partitions]
//!     name => STRING
//!     partitions => partition_index error_code timestamp offset
//! ```
//!
//! Version 0 answers with a descending list of offsets; callers only ever
//! want the last (smallest) entry, so parsing collapses the list into the
//! scalar `offset` that version 1 made official.

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

/// The base List Offsets response object.
#[derive(Debug, PartialEq)]
pub struct ListOffsetsResponse {
    pub header: HeaderResponse,
    /// Each topic in the response.
    pub topics: Vec<Topic>,
}

/// Each topic in the response.
#[derive(Debug, PartialEq)]
pub struct Topic {
    /// The topic name.
    pub name: Bytes,
    /// Each partition in the response.
    pub partitions: Vec<Partition>,
}

/// Each partition in the response.
#[derive(Debug, PartialEq)]
pub struct Partition {
    /// The partition index.
    pub partition_index: i32,
    /// The partition error code, or 0 if there was no error.
    pub error_code: KafkaCode,
    /// The timestamp associated with the returned offset, or -1. Version 1+.
    pub timestamp: i64,
    /// The returned offset.
    pub offset: i64,
}

impl ListOffsetsResponse {
    pub fn parse(s: Bytes, api_version: i16) -> Result<Self> {
        tracing::trace!("Parsing ListOffsetsResponse {:?}", s);
        let (_, response) = parse_list_offsets_response(NomBytes::new(s.clone()), api_version)
            .map_err(|err| {
                tracing::error!("ERROR: Failed parsing ListOffsetsResponse {:?}", err);
                tracing::error!("ERROR: ListOffsetsResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed ListOffsetsResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_list_offsets_response(
    s: NomBytes,
    api_version: i16,
) -> IResult<NomBytes, ListOffsetsResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, topics) = parser::parse_array(move |t| parse_topic(t, api_version))(s)?;

    Ok((s, ListOffsetsResponse { header, topics }))
}

fn parse_topic(s: NomBytes, api_version: i16) -> IResult<NomBytes, Topic> {
    let (s, name) = parser::parse_string(s)?;
    let (s, partitions) = parser::parse_array(move |p| parse_partition(p, api_version))(s)?;

    Ok((s, Topic { name, partitions }))
}

fn parse_partition(s: NomBytes, api_version: i16) -> IResult<NomBytes, Partition> {
    let (s, partition_index) = be_i32(s)?;
    let (s, error_code) = parser::parse_kafka_code(s)?;

    if api_version == 0 {
        let (s, offsets) = parser::parse_array(be_i64)(s)?;
        return Ok((
            s,
            Partition {
                partition_index,
                error_code,
                timestamp: -1,
                offset: offsets.last().copied().unwrap_or(-1),
            },
        ));
    }

    let (s, timestamp) = be_i64(s)?;
    let (s, offset) = be_i64(s)?;

    Ok((
        s,
        Partition {
            partition_index,
            error_code,
            timestamp,
            offset,
        },
    ))
}
