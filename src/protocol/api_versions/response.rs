//! Parsing and processing for ApiVersions responses.
//!
//! ### Protocol Def
//! ```text
//! ApiVersions Response (Version: 0) => error_code [api_keys]
//!   error_code => INT16
//!   api_keys => api_key min_version max_version
//!     api_key => INT16
//!     min_version => INT16
//!     max_version => INT16
//!
//! ApiVersions Response (Version: 1-2) => error_code [api_keys] throttle_time_ms
//! ApiVersions Response (Version: 3) => error_code [api_keys] throttle_time_ms TAG_BUFFER
//! ```
//!
//! The response header stays at version 0 even for the flexible request
//! (KIP-511): a broker that does not know the request version must still
//! be able to frame its error reply.

use bytes::Bytes;
use nom::{
    number::complete::{be_i16, be_i32},
    IResult,
};
use nombytes::NomBytes;

use crate::{
    error::{Error, KafkaCode, Result},
    parser,
    protocol::{parse_header_response, HeaderResponse},
};

/// The base ApiVersions response object.
#[derive(Debug, PartialEq)]
pub struct ApiVersionsResponse {
    pub header: HeaderResponse,
    /// The top-level error code.
    pub error_code: KafkaCode,
    /// The APIs supported by the broker.
    pub api_keys: Vec<ApiKeyRange>,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota.
    pub throttle_time_ms: i32,
}

/// The version range the broker supports for one API.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApiKeyRange {
    /// The API index.
    pub api_key: i16,
    /// The minimum supported version, inclusive.
    pub min_version: i16,
    /// The maximum supported version, inclusive.
    pub max_version: i16,
}

impl ApiVersionsResponse {
    /// Parse a response at the version the request went out with.
    ///
    /// When the error code is set the body is not parsed further: a broker
    /// rejecting the request version answers with a version 0 body
    /// regardless of what was asked for.
    pub fn parse(s: Bytes, api_version: i16) -> Result<Self> {
        tracing::trace!("Parsing ApiVersionsResponse {:?}", s);
        let (_, response) =
            parse_api_versions_response(NomBytes::new(s.clone()), api_version).map_err(|err| {
                tracing::error!("ERROR: Failed parsing ApiVersionsResponse {:?}", err);
                tracing::error!("ERROR: ApiVersionsResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed ApiVersionsResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_api_versions_response(
    s: NomBytes,
    api_version: i16,
) -> IResult<NomBytes, ApiVersionsResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, error_code) = parser::parse_kafka_code(s)?;

    if error_code != KafkaCode::None {
        return Ok((
            s,
            ApiVersionsResponse {
                header,
                error_code,
                api_keys: vec![],
                throttle_time_ms: 0,
            },
        ));
    }

    let (s, api_keys) = if api_version >= 3 {
        parser::parse_compact_array(parse_api_key_range_compact)(s)?
    } else {
        parser::parse_array(parse_api_key_range)(s)?
    };

    let (s, throttle_time_ms) = if api_version >= 1 {
        be_i32(s)?
    } else {
        (s, 0)
    };

    let s = if api_version >= 3 {
        parser::parse_tagged_fields(s)?.0
    } else {
        s
    };

    Ok((
        s,
        ApiVersionsResponse {
            header,
            error_code,
            api_keys,
            throttle_time_ms,
        },
    ))
}

fn parse_api_key_range(s: NomBytes) -> IResult<NomBytes, ApiKeyRange> {
    let (s, api_key) = be_i16(s)?;
    let (s, min_version) = be_i16(s)?;
    let (s, max_version) = be_i16(s)?;

    Ok((
        s,
        ApiKeyRange {
            api_key,
            min_version,
            max_version,
        },
    ))
}

fn parse_api_key_range_compact(s: NomBytes) -> IResult<NomBytes, ApiKeyRange> {
    let (s, range) = parse_api_key_range(s)?;
    let (s, ()) = parser::parse_tagged_fields(s)?;
    Ok((s, range))
}
