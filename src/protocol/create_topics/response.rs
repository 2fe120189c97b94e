//! Parsing and processing for Create Topics responses.
//!
//! ### Protocol Def
//! ```text
//! CreateTopics Response (Version: 0) => [topics]
//!   topics => name error_code
//!
//! CreateTopics Response (Version: 1) => [topics]
//!   topics => name error_code error_message
//!     name => STRING
//!     error_code => INT16
//!     error_message => NULLABLE_STRING
//! ```

use bytes::Bytes;
use nom::IResult;
use nombytes::NomBytes;

use crate::{
    error::{Error, KafkaCode, Result},
    parser,
    protocol::{parse_header_response, HeaderResponse},
};

/// The base Create Topics response object.
#[derive(Debug, PartialEq)]
pub struct CreateTopicsResponse {
    pub header: HeaderResponse,
    /// Results for each topic we tried to create.
    pub topics: Vec<TopicResult>,
}

/// Results for each topic we tried to create.
#[derive(Debug, PartialEq)]
pub struct TopicResult {
    /// The topic name.
    pub name: Bytes,
    /// The error code, or 0 if there was no error.
    pub error_code: KafkaCode,
    /// The error message, or null if there was no error. Version 1+.
    pub error_message: Option<Bytes>,
}

impl CreateTopicsResponse {
    pub fn parse(s: Bytes, api_version: i16) -> Result<Self> {
        tracing::trace!("Parsing CreateTopicsResponse {:?}", s);
        let (_, response) = parse_create_topics_response(NomBytes::new(s.clone()), api_version)
            .map_err(|err| {
                tracing::error!("ERROR: Failed parsing CreateTopicsResponse {:?}", err);
                tracing::error!("ERROR: CreateTopicsResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed CreateTopicsResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_create_topics_response(
    s: NomBytes,
    api_version: i16,
) -> IResult<NomBytes, CreateTopicsResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, topics) = parser::parse_array(move |t| parse_topic_result(t, api_version))(s)?;

    Ok((s, CreateTopicsResponse { header, topics }))
}

fn parse_topic_result(s: NomBytes, api_version: i16) -> IResult<NomBytes, TopicResult> {
    let (s, name) = parser::parse_string(s)?;
    let (s, error_code) = parser::parse_kafka_code(s)?;
    let (s, error_message) = if api_version >= 1 {
        parser::parse_nullable_string(s)?
    } else {
        (s, None)
    };

    Ok((
        s,
        TopicResult {
            name,
            error_code,
            error_message,
        },
    ))
}
