//! Encoding and creation for Describe Acls requests.
//!
//! ### Protocol Def
//! ```text
//! DescribeAcls Request (Version: 0) => resource_type resource_name principal host operation permission_type
//! DescribeAcls Request (Version: 1) => resource_type resource_name pattern_type principal host operation permission_type
//!   resource_type => INT8
//!   resource_name => NULLABLE_STRING
//!   pattern_type => INT8
//!   principal => NULLABLE_STRING
//!   host => NULLABLE_STRING
//!   operation => INT8
//!   permission_type => INT8
//! ```

use crate::{
    encode::ToByte,
    protocol::{
        acl::{AclFilter, Operation, PatternType, PermissionType, ResourceType},
        api_keys, HeaderRequest,
    },
};

/// The base Describe Acls request object.
#[derive(Debug)]
pub struct DescribeAclsRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// The filter selecting which ACLs to describe.
    pub filter: AclFilter,
}

impl<'a> DescribeAclsRequest<'a> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        filter: AclFilter,
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::DESCRIBE_ACLS,
            api_version,
            correlation_id,
            client_id,
        );
        Self { header, filter }
    }
}

pub(crate) fn encode_filter<T: bytes::BufMut>(
    filter: &AclFilter,
    api_version: i16,
    buffer: &mut T,
) -> crate::error::Result<()> {
    (filter.resource_type.unwrap_or(ResourceType::Any) as i8).encode(buffer)?;
    filter.resource_name.as_deref().encode(buffer)?;
    if api_version >= 1 {
        (filter.resource_pattern_type.unwrap_or(PatternType::Any) as i8).encode(buffer)?;
    }
    filter.principal.as_deref().encode(buffer)?;
    filter.host.as_deref().encode(buffer)?;
    (filter.operation.unwrap_or(Operation::Any) as i8).encode(buffer)?;
    (filter.permission_type.unwrap_or(PermissionType::Any) as i8).encode(buffer)?;
    Ok(())
}

impl<'a> ToByte for DescribeAclsRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding DescribeAclsRequest {:?}", self);
        self.header.encode(buffer)?;
        encode_filter(&self.filter, self.header.api_version, buffer)?;
        Ok(())
    }
}
