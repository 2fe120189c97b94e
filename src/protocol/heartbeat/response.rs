//! Parsing and processing for Heartbeat responses.
//!
//! ### Protocol Def
//! ```text
//! Heartbeat Response (Version: 0) => error_code
//! Heartbeat Response (Version: 1) => throttle_time_ms error_code
//!   throttle_time_ms => INT32
//!   error_code => INT16
//! ```

use bytes::Bytes;
use nom::{number::complete::be_i32, IResult};
use nombytes::NomBytes;

use crate::{
    error::{Error, KafkaCode, Result},
    parser,
    protocol::{parse_header_response, HeaderResponse},
};

/// The base Heartbeat response object.
#[derive(Debug, PartialEq)]
pub struct HeartbeatResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota. Version 1+.
    pub throttle_time_ms: i32,
    /// The error code, or 0 if there was no error.
    pub error_code: KafkaCode,
}

impl HeartbeatResponse {
    pub fn parse(s: Bytes, api_version: i16) -> Result<Self> {
        tracing::trace!("Parsing HeartbeatResponse {:?}", s);
        let (_, heartbeat) = parse_heartbeat_response(NomBytes::new(s.clone()), api_version)
            .map_err(|err| {
                tracing::error!("ERROR: Failed parsing HeartbeatResponse {:?}", err);
                tracing::error!("ERROR: HeartbeatResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed HeartbeatResponse {:?}", heartbeat);
        Ok(heartbeat)
    }
}

pub fn parse_heartbeat_response(
    s: NomBytes,
    api_version: i16,
) -> IResult<NomBytes, HeartbeatResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = if api_version >= 1 { be_i32(s)? } else { (s, 0) };
    let (s, error_code) = parser::parse_kafka_code(s)?;

    Ok((
        s,
        HeartbeatResponse {
            header,
            throttle_time_ms,
            error_code,
        },
    ))
}
