//! Parsing and processing for Delete Acls responses.
//!
//! ### Protocol Def
//! ```text
//! DeleteAcls Response (Version: 0-1) => throttle_time_ms [filter_results]
//!   throttle_time_ms => INT32
//!   filter_results => error_code error_message [matching_acls]
//!     error_code => INT16
//!     error_message => NULLABLE_STRING
//!     matching_acls => error_code error_message resource_type resource_name (pattern_type) principal host operation permission_type
//! ```
//!
//! `pattern_type` appears in version 1 only.

use bytes::Bytes;
use nom::{
    number::complete::{be_i32, be_i8},
    IResult,
};
use nombytes::NomBytes;
use num_traits::FromPrimitive;

use crate::{
    error::{Error, KafkaCode, Result},
    parser,
    protocol::{
        acl::{Operation, PatternType, PermissionType, ResourceType},
        parse_header_response, HeaderResponse,
    },
};

/// The base Delete Acls response object.
#[derive(Debug, PartialEq)]
pub struct DeleteAclsResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota.
    pub throttle_time_ms: i32,
    /// The results for each filter, in request order.
    pub filter_results: Vec<FilterResult>,
}

/// The results for each filter.
#[derive(Debug, PartialEq)]
pub struct FilterResult {
    /// The error code, or 0 if the filter succeeded.
    pub error_code: KafkaCode,
    /// The error message, or null if the filter succeeded.
    pub error_message: Option<Bytes>,
    /// The ACLs deleted by the filter.
    pub matching_acls: Vec<MatchingAcl>,
}

/// The ACLs deleted by a filter.
#[derive(Debug, PartialEq)]
pub struct MatchingAcl {
    /// The deletion error code, or 0 if the deletion succeeded.
    pub error_code: KafkaCode,
    /// The deletion error message, or null if the deletion succeeded.
    pub error_message: Option<Bytes>,
    /// The ACL resource type.
    pub resource_type: ResourceType,
    /// The ACL resource name.
    pub resource_name: Bytes,
    /// The ACL resource pattern type. Version 1+.
    pub pattern_type: PatternType,
    /// The ACL principal.
    pub principal: Bytes,
    /// The ACL host.
    pub host: Bytes,
    /// The ACL operation.
    pub operation: Operation,
    /// The ACL permission type.
    pub permission_type: PermissionType,
}

impl DeleteAclsResponse {
    pub fn parse(s: Bytes, api_version: i16) -> Result<Self> {
        tracing::trace!("Parsing DeleteAclsResponse {:?}", s);
        let (_, response) = parse_delete_acls_response(NomBytes::new(s.clone()), api_version)
            .map_err(|err| {
                tracing::error!("ERROR: Failed parsing DeleteAclsResponse {:?}", err);
                tracing::error!("ERROR: DeleteAclsResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed DeleteAclsResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_delete_acls_response(
    s: NomBytes,
    api_version: i16,
) -> IResult<NomBytes, DeleteAclsResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = be_i32(s)?;
    let (s, filter_results) = parser::parse_array(move |f| parse_filter_result(f, api_version))(s)?;

    Ok((
        s,
        DeleteAclsResponse {
            header,
            throttle_time_ms,
            filter_results,
        },
    ))
}

fn parse_filter_result(s: NomBytes, api_version: i16) -> IResult<NomBytes, FilterResult> {
    let (s, error_code) = parser::parse_kafka_code(s)?;
    let (s, error_message) = parser::parse_nullable_string(s)?;
    let (s, matching_acls) = parser::parse_array(move |a| parse_matching_acl(a, api_version))(s)?;

    Ok((
        s,
        FilterResult {
            error_code,
            error_message,
            matching_acls,
        },
    ))
}

fn parse_matching_acl(s: NomBytes, api_version: i16) -> IResult<NomBytes, MatchingAcl> {
    let (s, error_code) = parser::parse_kafka_code(s)?;
    let (s, error_message) = parser::parse_nullable_string(s)?;
    let (s, resource_type) = be_i8(s)?;
    let (s, resource_name) = parser::parse_string(s)?;
    let (s, pattern_type) = if api_version >= 1 {
        let (s, raw) = be_i8(s)?;
        (s, PatternType::from_i8(raw).unwrap_or(PatternType::Unknown))
    } else {
        (s, PatternType::Literal)
    };
    let (s, principal) = parser::parse_string(s)?;
    let (s, host) = parser::parse_string(s)?;
    let (s, operation) = be_i8(s)?;
    let (s, permission_type) = be_i8(s)?;

    Ok((
        s,
        MatchingAcl {
            error_code,
            error_message,
            resource_type: ResourceType::from_i8(resource_type)
                .unwrap_or(ResourceType::Unknown),
            resource_name,
            pattern_type,
            principal,
            host,
            operation: Operation::from_i8(operation).unwrap_or(Operation::Unknown),
            permission_type: PermissionType::from_i8(permission_type)
                .unwrap_or(PermissionType::Unknown),
        },
    ))
}
