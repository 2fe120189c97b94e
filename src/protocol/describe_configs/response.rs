//! Parsing and processing for Describe Configs responses.
//!
//! ### Protocol Def
//! ```text
//! DescribeConfigs Response (Version: 0) => throttle_time_ms [results]
//!   results => error_code error_message resource_type resource_name [configs]
//!     configs => name value read_only is_default is_sensitive
//!
//! DescribeConfigs Response (Version: 1) => throttle_time_ms [results]
//!   results => error_code error_message resource_type resource_name [configs]
//!     configs => name value read_only config_source is_sensitive [synonyms]
//!       synonyms => name value source
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

/// The base Describe Configs response object.
#[derive(Debug, PartialEq)]
pub struct DescribeConfigsResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota.
    pub throttle_time_ms: i32,
    /// The results for each resource.
    pub results: Vec<ResourceResult>,
}

/// The results for each resource.
#[derive(Debug, PartialEq)]
pub struct ResourceResult {
    /// The error code, or 0 if we were able to successfully describe the configurations.
    pub error_code: KafkaCode,
    /// The error message, or null if we were able to successfully describe the configurations.
    pub error_message: Option<Bytes>,
    /// The resource type.
    pub resource_type: i8,
    /// The resource name.
    pub resource_name: Bytes,
    /// Each listed configuration.
    pub configs: Vec<ConfigEntry>,
}

/// Each listed configuration.
#[derive(Debug, PartialEq)]
pub struct ConfigEntry {
    /// The configuration name.
    pub name: Bytes,
    /// The configuration value.
    pub value: Option<Bytes>,
    /// True if the configuration is read-only.
    pub read_only: bool,
    /// The configuration source. On a version 0 response this is derived
    /// from the is_default flag: DEFAULT_CONFIG (5) or UNKNOWN (0).
    pub config_source: i8,
    /// True if this configuration is sensitive.
    pub is_sensitive: bool,
    /// The synonyms for this configuration key. Version 1+.
    pub synonyms: Vec<Synonym>,
}

/// The synonyms for a configuration key.
#[derive(Debug, PartialEq)]
pub struct Synonym {
    /// The synonym name.
    pub name: Bytes,
    /// The synonym value.
    pub value: Option<Bytes>,
    /// The synonym source.
    pub source: i8,
}

impl DescribeConfigsResponse {
    pub fn parse(s: Bytes, api_version: i16) -> Result<Self> {
        tracing::trace!("Parsing DescribeConfigsResponse {:?}", s);
        let (_, response) = parse_describe_configs_response(NomBytes::new(s.clone()), api_version)
            .map_err(|err| {
                tracing::error!("ERROR: Failed parsing DescribeConfigsResponse {:?}", err);
                tracing::error!("ERROR: DescribeConfigsResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed DescribeConfigsResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_describe_configs_response(
    s: NomBytes,
    api_version: i16,
) -> IResult<NomBytes, DescribeConfigsResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = be_i32(s)?;
    let (s, results) = parser::parse_array(move |r| parse_resource_result(r, api_version))(s)?;

    Ok((
        s,
        DescribeConfigsResponse {
            header,
            throttle_time_ms,
            results,
        },
    ))
}

fn parse_resource_result(s: NomBytes, api_version: i16) -> IResult<NomBytes, ResourceResult> {
    let (s, error_code) = parser::parse_kafka_code(s)?;
    let (s, error_message) = parser::parse_nullable_string(s)?;
    let (s, resource_type) = be_i8(s)?;
    let (s, resource_name) = parser::parse_string(s)?;
    let (s, configs) = parser::parse_array(move |c| parse_config_entry(c, api_version))(s)?;

    Ok((
        s,
        ResourceResult {
            error_code,
            error_message,
            resource_type,
            resource_name,
            configs,
        },
    ))
}

const CONFIG_SOURCE_UNKNOWN: i8 = 0;
const CONFIG_SOURCE_DEFAULT: i8 = 5;

fn parse_config_entry(s: NomBytes, api_version: i16) -> IResult<NomBytes, ConfigEntry> {
    let (s, name) = parser::parse_string(s)?;
    let (s, value) = parser::parse_nullable_string(s)?;
    let (s, read_only) = parser::parse_boolean(s)?;
    let (s, config_source) = if api_version >= 1 {
        be_i8(s)?
    } else {
        let (s, is_default) = parser::parse_boolean(s)?;
        (
            s,
            if is_default {
                CONFIG_SOURCE_DEFAULT
            } else {
                CONFIG_SOURCE_UNKNOWN
            },
        )
    };
    let (s, is_sensitive) = parser::parse_boolean(s)?;
    let (s, synonyms) = if api_version >= 1 {
        parser::parse_array(parse_synonym)(s)?
    } else {
        (s, vec![])
    };

    Ok((
        s,
        ConfigEntry {
            name,
            value,
            read_only,
            config_source,
            is_sensitive,
            synonyms,
        },
    ))
}

fn parse_synonym(s: NomBytes) -> IResult<NomBytes, Synonym> {
    let (s, name) = parser::parse_string(s)?;
    let (s, value) = parser::parse_nullable_string(s)?;
    let (s, source) = be_i8(s)?;

    Ok((s, Synonym { name, value, source }))
}
