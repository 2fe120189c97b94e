//! Read broker and topic configuration entries.

pub mod request;
pub mod response;

pub const VERSIONS: &[i16] = &[1, 0];

/// Resource types shared by the configs and ACL APIs.
pub const RESOURCE_TYPE_TOPIC: i8 = 2;
pub const RESOURCE_TYPE_BROKER: i8 = 4;
