//! Parsing and processing for Delete Topics responses.
//!
//! ### Protocol Def
//! ```text
//! DeleteTopics Response (Version: 0) => [responses]
//! DeleteTopics Response (Version: 1) => throttle_time_ms [responses]
//!   throttle_time_ms => INT32
//!   responses => name error_code
//!     name => STRING
//!     error_code => INT16
//! ```

use bytes::Bytes;
use nom::{number::complete::be_i32, IResult};
use nombytes::NomBytes;

use crate::{
    error::{Error, KafkaCode, Result},
    parser,
    protocol::{parse_header_response, HeaderResponse},
};

/// The base Delete Topics response object.
#[derive(Debug, PartialEq)]
pub struct DeleteTopicsResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota. Version 1+.
    pub throttle_time_ms: i32,
    /// The results for each topic we tried to delete.
    pub responses: Vec<TopicResult>,
}

/// The results for each topic we tried to delete.
#[derive(Debug, PartialEq)]
pub struct TopicResult {
    /// The topic name.
    pub name: Bytes,
    /// The deletion error, or 0 if the deletion succeeded.
    pub error_code: KafkaCode,
}

impl DeleteTopicsResponse {
    pub fn parse(s: Bytes, api_version: i16) -> Result<Self> {
        tracing::trace!("Parsing DeleteTopicsResponse {:?}", s);
        let (_, response) = parse_delete_topics_response(NomBytes::new(s.clone()), api_version)
            .map_err(|err| {
                tracing::error!("ERROR: Failed parsing DeleteTopicsResponse {:?}", err);
                tracing::error!("ERROR: DeleteTopicsResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed DeleteTopicsResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_delete_topics_response(
    s: NomBytes,
    api_version: i16,
) -> IResult<NomBytes, DeleteTopicsResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = if api_version >= 1 { be_i32(s)? } else { (s, 0) };
    let (s, responses) = parser::parse_array(parse_result)(s)?;

    Ok((
        s,
        DeleteTopicsResponse {
            header,
            throttle_time_ms,
            responses,
        },
    ))
}

fn parse_result(s: NomBytes) -> IResult<NomBytes, TopicResult> {
    let (s, name) = parser::parse_string(s)?;
    let (s, error_code) = parser::parse_kafka_code(s)?;

    Ok((s, TopicResult { name, error_code }))
}
