//! Parsing and processing for Create Partitions responses.
//!
//! ### Protocol Def
//! ```text
//! CreatePartitions Response (Version: 0) => throttle_time_ms [results]
//!   throttle_time_ms => INT32
//!   results => name error_code error_message
//!     name => STRING
//!     error_code => INT16
//!     error_message => NULLABLE_STRING
//! ```

use bytes::Bytes;
use nom::{number::complete::be_i32, IResult};
use nombytes::NomBytes;

use crate::{
    error::{Error, KafkaCode, Result},
    parser,
    protocol::{parse_header_response, HeaderResponse},
};

/// The base Create Partitions response object.
#[derive(Debug, PartialEq)]
pub struct CreatePartitionsResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota.
    pub throttle_time_ms: i32,
    /// The partition creation results for each topic.
    pub results: Vec<TopicResult>,
}

/// The partition creation results for each topic.
#[derive(Debug, PartialEq)]
pub struct TopicResult {
    /// The topic name.
    pub name: Bytes,
    /// The result error, or 0 if there was no error.
    pub error_code: KafkaCode,
    /// The result message, or null if there was no error.
    pub error_message: Option<Bytes>,
}

impl TryFrom<Bytes> for CreatePartitionsResponse {
    type Error = Error;

    fn try_from(s: Bytes) -> Result<Self> {
        tracing::trace!("Parsing CreatePartitionsResponse {:?}", s);
        let (_, response) =
            parse_create_partitions_response(NomBytes::new(s.clone())).map_err(|err| {
                tracing::error!("ERROR: Failed parsing CreatePartitionsResponse {:?}", err);
                tracing::error!("ERROR: CreatePartitionsResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed CreatePartitionsResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_create_partitions_response(
    s: NomBytes,
) -> IResult<NomBytes, CreatePartitionsResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = be_i32(s)?;
    let (s, results) = parser::parse_array(parse_result)(s)?;

    Ok((
        s,
        CreatePartitionsResponse {
            header,
            throttle_time_ms,
            results,
        },
    ))
}

fn parse_result(s: NomBytes) -> IResult<NomBytes, TopicResult> {
    let (s, name) = parser::parse_string(s)?;
    let (s, error_code) = parser::parse_kafka_code(s)?;
    let (s, error_message) = parser::parse_nullable_string(s)?;

    Ok((
        s,
        TopicResult {
            name,
            error_code,
            error_message,
        },
    ))
}
