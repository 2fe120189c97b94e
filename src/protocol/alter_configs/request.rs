//! Encoding and creation for Alter Configs requests.
//!
//! ### Protocol Def
//! ```text
//! AlterConfigs Request (Version: 0-1) => [resources] validate_only
//!   resources => resource_type resource_name [configs]
//!     resource_type => INT8
//!     resource_name => STRING
//!     configs => name value
//!       name => STRING
//!       value => NULLABLE_STRING
//!   validate_only => BOOLEAN
//! ```

use crate::{
    encode::ToByte,
    protocol::{api_keys, HeaderRequest},
};

/// The base Alter Configs request object.
#[derive(Debug)]
pub struct AlterConfigsRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// The updates for each resource.
    pub resources: Vec<Resource<'a>>,
    /// True if we should validate the request, but not change the configurations.
    pub validate_only: bool,
}

/// The updates for each resource.
#[derive(Debug)]
pub struct Resource<'a> {
    /// The resource type.
    pub resource_type: i8,
    /// The resource name.
    pub resource_name: &'a str,
    /// The configurations to set.
    pub configs: Vec<Config<'a>>,
}

/// The configurations to set.
#[derive(Debug)]
pub struct Config<'a> {
    /// The configuration key name.
    pub name: &'a str,
    /// The value to set for the configuration key.
    pub value: Option<&'a str>,
}

impl<'a> AlterConfigsRequest<'a> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        validate_only: bool,
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::ALTER_CONFIGS,
            api_version,
            correlation_id,
            client_id,
        );
        Self {
            header,
            resources: vec![],
            validate_only,
        }
    }

    pub fn add(&mut self, resource_type: i8, resource_name: &'a str, configs: Vec<Config<'a>>) {
        self.resources.push(Resource {
            resource_type,
            resource_name,
            configs,
        });
    }
}

impl<'a> ToByte for AlterConfigsRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding AlterConfigsRequest {:?}", self);
        self.header.encode(buffer)?;
        self.resources.encode(buffer)?;
        self.validate_only.encode(buffer)?;
        Ok(())
    }
}

impl<'a> ToByte for Resource<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        self.resource_type.encode(buffer)?;
        self.resource_name.encode(buffer)?;
        self.configs.encode(buffer)?;
        Ok(())
    }
}

impl<'a> ToByte for Config<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        self.name.encode(buffer)?;
        self.value.encode(buffer)?;
        Ok(())
    }
}
