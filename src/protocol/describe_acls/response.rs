//! Parsing and processing for Describe Acls responses.
//!
//! ### Protocol Def
//! ```text
//! DescribeAcls Response (Version: 0) => throttle_time_ms error_code error_message [resources]
//!   resources => resource_type resource_name [acls]
//!
//! DescribeAcls Response (Version: 1) => throttle_time_ms error_code error_message [resources]
//!   resources => resource_type resource_name pattern_type [acls]
//!     acls => principal host operation permission_type
//! ```

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

/// The base Describe Acls response object.
#[derive(Debug, PartialEq)]
pub struct DescribeAclsResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota.
    pub throttle_time_ms: i32,
    /// The error code, or 0 if there was no error.
    pub error_code: KafkaCode,
    /// The error message, or null if there was no error.
    pub error_message: Option<Bytes>,
    /// Each resource with one or more matching ACLs.
    pub resources: Vec<Resource>,
}

/// Each resource with one or more matching ACLs.
#[derive(Debug, PartialEq)]
pub struct Resource {
    /// The resource type.
    pub resource_type: ResourceType,
    /// The resource name.
    pub resource_name: Bytes,
    /// The resource pattern type. Version 1+.
    pub pattern_type: PatternType,
    /// The ACLs bound to the resource.
    pub acls: Vec<Acl>,
}

/// The ACLs bound to a resource.
#[derive(Debug, PartialEq)]
pub struct Acl {
    /// The ACL principal.
    pub principal: Bytes,
    /// The ACL host.
    pub host: Bytes,
    /// The ACL operation.
    pub operation: Operation,
    /// The ACL permission type.
    pub permission_type: PermissionType,
}

impl DescribeAclsResponse {
    pub fn parse(s: Bytes, api_version: i16) -> Result<Self> {
        tracing::trace!("Parsing DescribeAclsResponse {:?}", s);
        let (_, response) = parse_describe_acls_response(NomBytes::new(s.clone()), api_version)
            .map_err(|err| {
                tracing::error!("ERROR: Failed parsing DescribeAclsResponse {:?}", err);
                tracing::error!("ERROR: DescribeAclsResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed DescribeAclsResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_describe_acls_response(
    s: NomBytes,
    api_version: i16,
) -> IResult<NomBytes, DescribeAclsResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = be_i32(s)?;
    let (s, error_code) = parser::parse_kafka_code(s)?;
    let (s, error_message) = parser::parse_nullable_string(s)?;
    let (s, resources) = parser::parse_array(move |r| parse_resource(r, api_version))(s)?;

    Ok((
        s,
        DescribeAclsResponse {
            header,
            throttle_time_ms,
            error_code,
            error_message,
            resources,
        },
    ))
}

fn parse_resource(s: NomBytes, api_version: i16) -> IResult<NomBytes, Resource> {
    let (s, resource_type) = be_i8(s)?;
    let (s, resource_name) = parser::parse_string(s)?;
    let (s, pattern_type) = if api_version >= 1 {
        let (s, raw) = be_i8(s)?;
        (s, PatternType::from_i8(raw).unwrap_or(PatternType::Unknown))
    } else {
        (s, PatternType::Literal)
    };
    let (s, acls) = parser::parse_array(parse_acl)(s)?;

    Ok((
        s,
        Resource {
            resource_type: ResourceType::from_i8(resource_type)
                .unwrap_or(ResourceType::Unknown),
            resource_name,
            pattern_type,
            acls,
        },
    ))
}

fn parse_acl(s: NomBytes) -> IResult<NomBytes, Acl> {
    let (s, principal) = parser::parse_string(s)?;
    let (s, host) = parser::parse_string(s)?;
    let (s, operation) = be_i8(s)?;
    let (s, permission_type) = be_i8(s)?;

    Ok((
        s,
        Acl {
            principal,
            host,
            operation: Operation::from_i8(operation).unwrap_or(Operation::Unknown),
            permission_type: PermissionType::from_i8(permission_type)
                .unwrap_or(PermissionType::Unknown),
        },
    ))
}
