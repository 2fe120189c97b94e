//! Create ACL bindings.

pub mod request;
pub mod response;

pub const VERSIONS: &[i16] = &[1, 0];

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        encode::ToByte,
        protocol::acl::{AclEntry, Operation, PatternType, PermissionType, ResourceType},
    };

    #[test]
    fn encode_v1_carries_pattern_type() {
        let entry = AclEntry {
            resource_type: ResourceType::Topic,
            resource_name: String::from("t"),
            resource_pattern_type: PatternType::Literal,
            principal: String::from("User:alice"),
            host: String::from("*"),
            operation: Operation::Read,
            permission_type: PermissionType::Allow,
        };

        let req = request::CreateAclsRequest::new(1, 1, "rust", vec![entry.clone()]);
        let mut v1 = vec![];
        req.encode(&mut v1).unwrap();

        let req = request::CreateAclsRequest::new(0, 1, "rust", vec![entry]);
        let mut v0 = vec![];
        req.encode(&mut v0).unwrap();

        // the single pattern_type byte is the only difference
        assert_eq!(v1.len(), v0.len() + 1);
    }
}
