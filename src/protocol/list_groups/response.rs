//! Parsing and processing for List Groups responses.
//!
//! ### Protocol Def
//! ```text
//! ListGroups Response (Version: 0) => error_code [groups]
//! ListGroups Response (Version: 1) => throttle_time_ms error_code [groups]
//!   throttle_time_ms => INT32
//!   error_code => INT16
//!   groups => group_id protocol_type
//!     group_id => STRING
//!     protocol_type => STRING
//! ```

use bytes::Bytes;
use nom::{number::complete::be_i32, IResult};
use nombytes::NomBytes;

use crate::{
    error::{Error, KafkaCode, Result},
    parser,
    protocol::{parse_header_response, HeaderResponse},
};

/// The base List Groups response object.
#[derive(Debug, PartialEq)]
pub struct ListGroupsResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota. Version 1+.
    pub throttle_time_ms: i32,
    /// The error code, or 0 if there was no error.
    pub error_code: KafkaCode,
    /// Each group in the response.
    pub groups: Vec<Group>,
}

/// Each group in the response.
#[derive(Debug, PartialEq)]
pub struct Group {
    /// The group ID.
    pub group_id: Bytes,
    /// The group protocol type.
    pub protocol_type: Bytes,
}

impl ListGroupsResponse {
    pub fn parse(s: Bytes, api_version: i16) -> Result<Self> {
        tracing::trace!("Parsing ListGroupsResponse {:?}", s);
        let (_, response) = parse_list_groups_response(NomBytes::new(s.clone()), api_version)
            .map_err(|err| {
                tracing::error!("ERROR: Failed parsing ListGroupsResponse {:?}", err);
                tracing::error!("ERROR: ListGroupsResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed ListGroupsResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_list_groups_response(
    s: NomBytes,
    api_version: i16,
) -> IResult<NomBytes, ListGroupsResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = if api_version >= 1 { be_i32(s)? } else { (s, 0) };
    let (s, error_code) = parser::parse_kafka_code(s)?;
    let (s, groups) = parser::parse_array(parse_group)(s)?;

    Ok((
        s,
        ListGroupsResponse {
            header,
            throttle_time_ms,
            error_code,
            groups,
        },
    ))
}

fn parse_group(s: NomBytes) -> IResult<NomBytes, Group> {
    let (s, group_id) = parser::parse_string(s)?;
    let (s, protocol_type) = parser::parse_string(s)?;

    Ok((
        s,
        Group {
            group_id,
            protocol_type,
        },
    ))
}
