//! Parsing and processing for Find Coordinator responses.
//!
//! ### Protocol Def
//! ```text
//! FindCoordinator Response (Version: 0) => error_code node_id host port
//!
//! FindCoordinator Response (Version: 1) => throttle_time_ms error_code error_message node_id host port
//!   throttle_time_ms => INT32
//!   error_code => INT16
//!   error_message => NULLABLE_STRING
//!   node_id => INT32
//!   host => STRING
//!   port => INT32
//! ```

use bytes::Bytes;
use nom::{number::complete::be_i32, IResult};
use nombytes::NomBytes;

use crate::{
    error::{Error, KafkaCode, Result},
    parser,
    protocol::{parse_header_response, HeaderResponse},
};

/// The base Find Coordinator response object.
#[derive(Debug, PartialEq)]
pub struct FindCoordinatorResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota. Version 1+.
    pub throttle_time_ms: i32,
    /// The error code, or 0 if there was no error.
    pub error_code: KafkaCode,
    /// The error message, or null if there was no error. Version 1+.
    pub error_message: Option<Bytes>,
    /// The node id of the coordinator.
    pub node_id: i32,
    /// The host name of the coordinator.
    pub host: Bytes,
    /// The port of the coordinator.
    pub port: i32,
}

impl FindCoordinatorResponse {
    pub fn parse(s: Bytes, api_version: i16) -> Result<Self> {
        tracing::trace!("Parsing FindCoordinatorResponse {:?}", s);
        let (_, response) = parse_find_coordinator_response(NomBytes::new(s.clone()), api_version)
            .map_err(|err| {
                tracing::error!("ERROR: Failed parsing FindCoordinatorResponse {:?}", err);
                tracing::error!("ERROR: FindCoordinatorResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed FindCoordinatorResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_find_coordinator_response(
    s: NomBytes,
    api_version: i16,
) -> IResult<NomBytes, FindCoordinatorResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = if api_version >= 1 { be_i32(s)? } else { (s, 0) };
    let (s, error_code) = parser::parse_kafka_code(s)?;
    let (s, error_message) = if api_version >= 1 {
        parser::parse_nullable_string(s)?
    } else {
        (s, None)
    };
    let (s, node_id) = be_i32(s)?;
    let (s, host) = parser::parse_string(s)?;
    let (s, port) = be_i32(s)?;

    Ok((
        s,
        FindCoordinatorResponse {
            header,
            throttle_time_ms,
            error_code,
            error_message,
            node_id,
            host,
            port,
        },
    ))
}
