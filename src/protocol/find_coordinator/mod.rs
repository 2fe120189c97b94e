//! Locate the coordinator broker for a consumer group.
//!
//! The offsets for a given consumer group are maintained by a specific
//! broker called the group coordinator. A consumer needs to issue its
//! offset commit and fetch requests to this specific broker, discovered
//! through this API.

pub mod request;
pub mod response;

pub const VERSIONS: &[i16] = &[1, 0];

/// Coordinator key types. Version 1+.
pub const COORDINATOR_TYPE_GROUP: i8 = 0;
pub const COORDINATOR_TYPE_TRANSACTION: i8 = 1;
