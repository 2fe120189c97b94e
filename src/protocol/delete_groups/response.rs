//! Parsing and processing for Delete Groups responses.
//!
//! ### Protocol Def
//! ```text
//! DeleteGroups Response (Version: 0-1) => throttle_time_ms [results]
//!   throttle_time_ms => INT32
//!   results => group_id error_code
//!     group_id => STRING
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

/// The base Delete Groups response object.
#[derive(Debug, PartialEq)]
pub struct DeleteGroupsResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota.
    pub throttle_time_ms: i32,
    /// The deletion results.
    pub results: Vec<GroupResult>,
}

/// The deletion results.
#[derive(Debug, PartialEq)]
pub struct GroupResult {
    /// The group id.
    pub group_id: Bytes,
    /// The deletion error, or 0 if the deletion succeeded.
    pub error_code: KafkaCode,
}

impl TryFrom<Bytes> for DeleteGroupsResponse {
    type Error = Error;

    fn try_from(s: Bytes) -> Result<Self> {
        tracing::trace!("Parsing DeleteGroupsResponse {:?}", s);
        let (_, response) = parse_delete_groups_response(NomBytes::new(s.clone())).map_err(|err| {
            tracing::error!("ERROR: Failed parsing DeleteGroupsResponse {:?}", err);
            tracing::error!("ERROR: DeleteGroupsResponse Bytes {:?}", s);
            Error::ParsingError(s)
        })?;
        tracing::trace!("Parsed DeleteGroupsResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_delete_groups_response(s: NomBytes) -> IResult<NomBytes, DeleteGroupsResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = be_i32(s)?;
    let (s, results) = parser::parse_array(parse_result)(s)?;

    Ok((
        s,
        DeleteGroupsResponse {
            header,
            throttle_time_ms,
            results,
        },
    ))
}

fn parse_result(s: NomBytes) -> IResult<NomBytes, GroupResult> {
    let (s, group_id) = parser::parse_string(s)?;
    let (s, error_code) = parser::parse_kafka_code(s)?;

    Ok((
        s,
        GroupResult {
            group_id,
            error_code,
        },
    ))
}
