//! Encoding and creation for Leave Group requests.
//!
//! To explicitly leave a group, the client can send a leave group request.
//! This is preferred over letting the session timeout expire since it
//! allows the group to rebalance faster.
//!
//! ### Protocol Def
//! ```text
//! LeaveGroup Request (Version: 0-1) => group_id member_id
//!   group_id => STRING
//!   member_id => STRING
//! ```

use bytes::Bytes;
use nom::AsBytes;

use crate::{
    encode::ToByte,
    error::{Error, Result},
    protocol::{api_keys, HeaderRequest},
};

/// The base Leave Group request object.
#[derive(Debug)]
pub struct LeaveGroupRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// The ID of the group to leave.
    pub group_id: &'a str,
    /// The member ID to remove from the group.
    pub member_id: String,
}

impl<'a> LeaveGroupRequest<'a> {
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        group_id: &'a str,
        member_id: Bytes,
    ) -> Result<Self> {
        let header = HeaderRequest::new(
            api_keys::LEAVE_GROUP,
            api_version,
            correlation_id,
            client_id,
        );
        Ok(Self {
            header,
            group_id,
            member_id: String::from_utf8(member_id.as_bytes().to_vec())
                .map_err(|_| Error::DecodingUtf8Error)?,
        })
    }
}

impl<'a> ToByte for LeaveGroupRequest<'a> {
    fn encode<T: bytes::BufMut>(&self, buffer: &mut T) -> crate::error::Result<()> {
        tracing::trace!("Encoding LeaveGroupRequest {:?}", self);
        self.header.encode(buffer)?;
        self.group_id.encode(buffer)?;
        self.member_id.encode(buffer)?;
        Ok(())
    }
}
