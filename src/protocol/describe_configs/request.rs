//! Encoding and creation for Describe Configs requests.
//!
//! ### Protocol Def
//! ```text
//! DescribeConfigs Request (Version: 0) => [resources]
//! DescribeConfigs Request (Version: 1) => [resources] include_synonyms
//!   resources => resource_type resource_name [configuration_keys]
//!     resource_type => INT8
//!     resource_name => STRING
//!     configuration_keys => STRING
//!   include_synonyms => BOOLEAN
//! ```

use crate::{
    encode::{encode_as_array, AsStrings, ToByte},
    protocol::{api_keys, HeaderRequest},
};

/// The base Describe Configs request object.
#[derive(Debug)]
pub struct DescribeConfigsRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// The resources whose configurations we want to describe.
    pub resources: Vec<Resource<'a>>,
    /// True if we should include all synonyms. Version 1+.
    pub include_synonyms: bool,
}

/// The resources whose configurations we want to describe.
#[derive(Debug)]
pub struct Resource<'a> {
    /// The resource type.
    pub resource_type: i8,
    /// The resource name.
    pub resource_name: &'a str,
    /// The configuration keys to list, empty to list all configuration keys.
    pub configuration_keys: Vec<&'a str>,
}

impl<'a> DescribeConfigsRequest<'a> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        include_synonyms: bool,
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::DESCRIBE_CONFIGS,
            api_version,
            correlation_id,
            client_id,
        );
        Self {
            header,
            resources: vec![],
            include_synonyms,
        }
    }

    pub fn add(
        &mut self,
        resource_type: i8,
        resource_name: &'a str,
        configuration_keys: Vec<&'a str>,
    ) {
        self.resources.push(Resource {
            resource_type,
            resource_name,
            configuration_keys,
        });
    }
}

impl<'a> ToByte for DescribeConfigsRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding DescribeConfigsRequest {:?}", self);
        self.header.encode(buffer)?;
        encode_as_array(buffer, &self.resources, |buffer, resource| {
            resource.resource_type.encode(buffer)?;
            resource.resource_name.encode(buffer)?;
            // a null key list asks for every configuration entry
            if resource.configuration_keys.is_empty() {
                (-1i32).encode(buffer)
            } else {
                AsStrings(&resource.configuration_keys).encode(buffer)
            }
        })?;
        if self.header.api_version >= 1 {
            self.include_synonyms.encode(buffer)?;
        }
        Ok(())
    }
}
