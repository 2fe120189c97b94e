//! Parsing and processing for Create Acls responses.
//!
//! ### Protocol Def
//! ```text
//! CreateAcls Response (Version: 0-1) => throttle_time_ms [results]
//!   throttle_time_ms => INT32
//!   results => error_code error_message
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

/// The base Create Acls response object.
#[derive(Debug, PartialEq)]
pub struct CreateAclsResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota.
    pub throttle_time_ms: i32,
    /// The results for each ACL creation, in request order.
    pub results: Vec<AclResult>,
}

/// The results for each ACL creation.
#[derive(Debug, PartialEq)]
pub struct AclResult {
    /// The result error, or 0 if there was no error.
    pub error_code: KafkaCode,
    /// The result message, or null if there was no error.
    pub error_message: Option<Bytes>,
}

impl TryFrom<Bytes> for CreateAclsResponse {
    type Error = Error;

    fn try_from(s: Bytes) -> Result<Self> {
        tracing::trace!("Parsing CreateAclsResponse {:?}", s);
        let (_, response) = parse_create_acls_response(NomBytes::new(s.clone())).map_err(|err| {
            tracing::error!("ERROR: Failed parsing CreateAclsResponse {:?}", err);
            tracing::error!("ERROR: CreateAclsResponse Bytes {:?}", s);
            Error::ParsingError(s)
        })?;
        tracing::trace!("Parsed CreateAclsResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_create_acls_response(s: NomBytes) -> IResult<NomBytes, CreateAclsResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = be_i32(s)?;
    let (s, results) = parser::parse_array(parse_result)(s)?;

    Ok((
        s,
        CreateAclsResponse {
            header,
            throttle_time_ms,
            results,
        },
    ))
}

fn parse_result(s: NomBytes) -> IResult<NomBytes, AclResult> {
    let (s, error_code) = parser::parse_kafka_code(s)?;
    let (s, error_message) = parser::parse_nullable_string(s)?;

    Ok((
        s,
        AclResult {
            error_code,
            error_message,
        },
    ))
}
