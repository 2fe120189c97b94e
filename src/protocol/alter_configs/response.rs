//! Parsing and processing for Alter Configs responses.
//!
//! ### Protocol Def
//! ```text
//! AlterConfigs Response (Version: 0-1) => throttle_time_ms [responses]
//!   throttle_time_ms => INT32
//!   responses => error_code error_message resource_type resource_name
//!     error_code => INT16
//!     error_message => NULLABLE_STRING
//!     resource_type => INT8
//!     resource_name => STRING
//! ```

use bytes::Bytes;
use nom::{
    number::complete::{be_i32, be_i8},
    IResult,
};
use nombytes::NomBytes;

use crate::{
    error::{Error, KafkaCode, Result},
    parser,
    protocol::{parse_header_response, HeaderResponse},
};

/// The base Alter Configs response object.
#[derive(Debug, PartialEq)]
pub struct AlterConfigsResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota.
    pub throttle_time_ms: i32,
    /// The responses for each resource.
    pub responses: Vec<ResourceResponse>,
}

/// The responses for each resource.
#[derive(Debug, PartialEq)]
pub struct ResourceResponse {
    /// The resource error code, or 0 if there was no error.
    pub error_code: KafkaCode,
    /// The resource error message, or null if there was no error.
    pub error_message: Option<Bytes>,
    /// The resource type.
    pub resource_type: i8,
    /// The resource name.
    pub resource_name: Bytes,
}

impl TryFrom<Bytes> for AlterConfigsResponse {
    type Error = Error;

    fn try_from(s: Bytes) -> Result<Self> {
        tracing::trace!("Parsing AlterConfigsResponse {:?}", s);
        let (_, response) = parse_alter_configs_response(NomBytes::new(s.clone())).map_err(|err| {
            tracing::error!("ERROR: Failed parsing AlterConfigsResponse {:?}", err);
            tracing::error!("ERROR: AlterConfigsResponse Bytes {:?}", s);
            Error::ParsingError(s)
        })?;
        tracing::trace!("Parsed AlterConfigsResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_alter_configs_response(s: NomBytes) -> IResult<NomBytes, AlterConfigsResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = be_i32(s)?;
    let (s, responses) = parser::parse_array(parse_resource_response)(s)?;

    Ok((
        s,
        AlterConfigsResponse {
            header,
            throttle_time_ms,
            responses,
        },
    ))
}

fn parse_resource_response(s: NomBytes) -> IResult<NomBytes, ResourceResponse> {
    let (s, error_code) = parser::parse_kafka_code(s)?;
    let (s, error_message) = parser::parse_nullable_string(s)?;
    let (s, resource_type) = be_i8(s)?;
    let (s, resource_name) = parser::parse_string(s)?;

    Ok((
        s,
        ResourceResponse {
            error_code,
            error_message,
            resource_type,
            resource_name,
        },
    ))
}
