//! Parsing and processing for Leave Group responses.
//!
//! ### Protocol Def
//! ```text
//! LeaveGroup Response (Version: 0) => error_code
//! LeaveGroup Response (Version: 1) => throttle_time_ms error_code
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

/// The base Leave Group response object.
#[derive(Debug, PartialEq)]
pub struct LeaveGroupResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota. Version 1+.
    pub throttle_time_ms: i32,
    /// The error code, or 0 if there was no error.
    pub error_code: KafkaCode,
}

impl LeaveGroupResponse {
    pub fn parse(s: Bytes, api_version: i16) -> Result<Self> {
        tracing::trace!("Parsing LeaveGroupResponse {:?}", s);
        let (_, leave_group) = parse_leave_group_response(NomBytes::new(s.clone()), api_version)
            .map_err(|err| {
                tracing::error!("ERROR: Failed parsing LeaveGroupResponse {:?}", err);
                tracing::error!("ERROR: LeaveGroupResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed LeaveGroupResponse {:?}", leave_group);
        Ok(leave_group)
    }
}

pub fn parse_leave_group_response(
    s: NomBytes,
    api_version: i16,
) -> IResult<NomBytes, LeaveGroupResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = if api_version >= 1 { be_i32(s)? } else { (s, 0) };
    let (s, error_code) = parser::parse_kafka_code(s)?;

    Ok((
        s,
        LeaveGroupResponse {
            header,
            throttle_time_ms,
            error_code,
        },
    ))
}
