//! Encoding and creation for Find Coordinator requests.
//!
//! ### Protocol Def
//! ```text
//! FindCoordinator Request (Version: 0) => key
//!   key => STRING
//!
//! FindCoordinator Request (Version: 1) => key key_type
//!   key => STRING
//!   key_type => INT8
//! ```

use crate::{
    encode::ToByte,
    protocol::{api_keys, HeaderRequest},
};

/// The base Find Coordinator request object.
#[derive(Debug)]
pub struct FindCoordinatorRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// The coordinator key; a group id or a transactional id.
    pub key: &'a str,
    /// The coordinator key type. Version 1+.
    pub key_type: i8,
}

impl<'a> FindCoordinatorRequest<'a> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        key: &'a str,
        key_type: i8,
    ) -> Self {
        let header = HeaderRequest::new(
            api_keys::FIND_COORDINATOR,
            api_version,
            correlation_id,
            client_id,
        );
        Self {
            header,
            key,
            key_type,
        }
    }
}

impl<'a> ToByte for FindCoordinatorRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding FindCoordinatorRequest {:?}", self);
        self.header.encode(buffer)?;
        self.key.encode(buffer)?;
        if self.header.api_version >= 1 {
            self.key_type.encode(buffer)?;
        }
        Ok(())
    }
}
