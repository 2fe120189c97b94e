//! Encoding and creation for Create Acls requests.
//!
//! ### Protocol Def
//! ```text
//! CreateAcls Request (Version: 0) => [creations]
//!   creations => resource_type resource_name principal host operation permission_type
//!
//! CreateAcls Request (Version: 1) => [creations]
//!   creations => resource_type resource_name resource_pattern_type principal host operation permission_type
//!     resource_type => INT8
//!     resource_name => STRING
//!     resource_pattern_type => INT8
//!     principal => STRING
//!     host => STRING
//!     operation => INT8
//!     permission_type => INT8
//! ```

use crate::{
    encode::{encode_as_array, ToByte},
    protocol::{acl::AclEntry, api_keys, HeaderRequest},
};

/// The base Create Acls request object.
#[derive(Debug)]
pub struct CreateAclsRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// The ACLs that we want to create.
    pub creations: Vec<AclEntry>,
}

impl<'a> CreateAclsRequest<'a> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        creations: Vec<AclEntry>,
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::CREATE_ACLS,
            api_version,
            correlation_id,
            client_id,
        );
        Self { header, creations }
    }
}

impl<'a> ToByte for CreateAclsRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding CreateAclsRequest {:?}", self);
        let version = self.header.api_version;
        self.header.encode(buffer)?;
        encode_as_array(buffer, &self.creations, |buffer, creation| {
            (creation.resource_type as i8).encode(buffer)?;
            creation.resource_name.encode(buffer)?;
            if version >= 1 {
                (creation.resource_pattern_type as i8).encode(buffer)?;
            }
            creation.principal.encode(buffer)?;
            creation.host.encode(buffer)?;
            (creation.operation as i8).encode(buffer)?;
            (creation.permission_type as i8).encode(buffer)
        })?;
        Ok(())
    }
}
