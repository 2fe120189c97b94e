//! Shared vocabulary for the ACL family of requests.
//!
//! Values follow the broker's `AclBinding` tables; they are stable across
//! all versions of the Describe/Create/DeleteAcls APIs.

use num_derive::FromPrimitive;

/// The type of Kafka resource an ACL binds to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum ResourceType {
    Unknown = 0,
    Any = 1,
    Topic = 2,
    Group = 3,
    Cluster = 4,
    TransactionalId = 5,
    DelegationToken = 6,
}

/// How the resource name in a binding or filter is matched (KIP-290).
/// Version 1+ of the ACL APIs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum PatternType {
    Unknown = 0,
    Any = 1,
    Match = 2,
    Literal = 3,
    Prefixed = 4,
}

/// The operation an ACL allows or denies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum Operation {
    Unknown = 0,
    Any = 1,
    All = 2,
    Read = 3,
    Write = 4,
    Create = 5,
    Delete = 6,
    Alter = 7,
    Describe = 8,
    ClusterAction = 9,
    DescribeConfigs = 10,
    AlterConfigs = 11,
    IdempotentWrite = 12,
}

/// Whether the ACL allows or denies the operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum PermissionType {
    Unknown = 0,
    Any = 1,
    Deny = 2,
    Allow = 3,
}

/// One ACL entry as callers describe it: who may do what to which
/// resource.
#[derive(Clone, Debug, PartialEq)]
pub struct AclEntry {
    pub resource_type: ResourceType,
    pub resource_name: String,
    /// Only encoded on version 1+ requests.
    pub resource_pattern_type: PatternType,
    pub principal: String,
    pub host: String,
    pub operation: Operation,
    pub permission_type: PermissionType,
}

/// A filter for matching ACL entries; `None` fields match anything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AclFilter {
    pub resource_type: Option<ResourceType>,
    pub resource_name: Option<String>,
    /// Only encoded on version 1+ requests.
    pub resource_pattern_type: Option<PatternType>,
    pub principal: Option<String>,
    pub host: Option<String>,
    pub operation: Option<Operation>,
    pub permission_type: Option<PermissionType>,
}

impl AclFilter {
    /// A filter matching every ACL on the cluster.
    pub fn any() -> Self {
        Self {
            resource_type: Some(ResourceType::Any),
            resource_name: None,
            resource_pattern_type: Some(PatternType::Any),
            principal: None,
            host: None,
            operation: Some(Operation::Any),
            permission_type: Some(PermissionType::Any),
        }
    }
}
