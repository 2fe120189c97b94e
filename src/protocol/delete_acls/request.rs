//! Encoding and creation for Delete Acls requests.
//!
//! ### Protocol Def
//! ```text
//! DeleteAcls Request (Version: 0) => [filters]
//!   filters => resource_type resource_name principal host operation permission_type
//!
//! DeleteAcls Request (Version: 1) => [filters]
//!   filters => resource_type resource_name pattern_type_filter principal host operation permission_type
//!     resource_type => INT8
//!     resource_name => NULLABLE_STRING
//!     pattern_type_filter => INT8
//!     principal => NULLABLE_STRING
//!     host => NULLABLE_STRING
//!     operation => INT8
//!     permission_type => INT8
//! ```

use crate::{
    encode::{encode_as_array, ToByte},
    protocol::{acl::AclFilter, api_keys, describe_acls::request::encode_filter, HeaderRequest},
};

/// The base Delete Acls request object.
#[derive(Debug)]
pub struct DeleteAclsRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// The filters to use when deleting ACLs.
    pub filters: Vec<AclFilter>,
}

impl<'a> DeleteAclsRequest<'a> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        filters: Vec<AclFilter>,
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::DELETE_ACLS,
            api_version,
            correlation_id,
            client_id,
        );
        Self { header, filters }
    }
}

impl<'a> ToByte for DeleteAclsRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding DeleteAclsRequest {:?}", self);
        let version = self.header.api_version;
        self.header.encode(buffer)?;
        encode_as_array(buffer, &self.filters, |buffer, filter| {
            encode_filter(filter, version, buffer)
        })?;
        Ok(())
    }
}
