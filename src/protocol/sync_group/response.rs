//! Parsing and processing for Sync Group responses.
//!
//! Each member in the group will receive the assignment
//! from the leader in the sync group response.
//!
//! ### Protocol Def
//! ```text
//! SyncGroup Response (Version: 1) => throttle_time_ms error_code assignment
//!   throttle_time_ms => INT32
//!   error_code => INT16
//!   assignment => BYTES
//!
//! MemberAssignment => Version PartitionAssignment
//!   Version => int16
//!   PartitionAssignment => [Topic [Partition]]
//!     Topic => string
//!     Partition => int32
//!   UserData => bytes
//! ```

use bytes::Bytes;
use nom::{
    number::complete::{be_i16, be_i32},
    IResult,
};
use nombytes::NomBytes;

use crate::{
    error::{Error, KafkaCode, Result},
    parser,
    protocol::{parse_header_response, HeaderResponse},
};

/// The base Sync Group response object.
#[derive(Debug, PartialEq)]
pub struct SyncGroupResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota.
    pub throttle_time_ms: i32,
    /// The error code, or 0 if there was no error.
    pub error_code: KafkaCode,
    /// The member assignment chosen by the leader, decoded.
    pub assignment: MemberAssignment,
}

/// The member assignment chosen by the leader.
#[derive(Debug, PartialEq)]
pub struct MemberAssignment {
    pub version: i16,
    pub partition_assignments: Vec<PartitionAssignment>,
    pub user_data: Option<Bytes>,
}

#[derive(Debug, PartialEq)]
pub struct PartitionAssignment {
    pub topic_name: Bytes,
    pub partitions: Vec<i32>,
}

impl TryFrom<Bytes> for SyncGroupResponse {
    type Error = Error;

    fn try_from(s: Bytes) -> Result<Self> {
        tracing::trace!("Parsing SyncGroupResponse {:?}", s);
        let (_, sync_group) = parse_sync_group_response(NomBytes::new(s.clone())).map_err(|err| {
            tracing::error!("ERROR: Failed parsing SyncGroupResponse {:?}", err);
            tracing::error!("ERROR: SyncGroupResponse Bytes {:?}", s);
            Error::ParsingError(s)
        })?;
        tracing::trace!("Parsed SyncGroupResponse {:?}", sync_group);
        Ok(sync_group)
    }
}

pub fn parse_sync_group_response(s: NomBytes) -> IResult<NomBytes, SyncGroupResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = be_i32(s)?;
    let (s, error_code) = parser::parse_kafka_code(s)?;
    let (s, assignment_bytes) = parser::parse_nullable_bytes(s)?;

    // followers of an empty assignment get zero bytes back
    let assignment = match assignment_bytes {
        Some(bytes) if !bytes.is_empty() => {
            let (_, assignment) = parse_member_assignment(NomBytes::new(bytes))?;
            assignment
        }
        _ => MemberAssignment {
            version: 0,
            partition_assignments: vec![],
            user_data: None,
        },
    };

    Ok((
        s,
        SyncGroupResponse {
            header,
            throttle_time_ms,
            error_code,
            assignment,
        },
    ))
}

fn parse_member_assignment(s: NomBytes) -> IResult<NomBytes, MemberAssignment> {
    let (s, version) = be_i16(s)?;
    let (s, partition_assignments) = parser::parse_array(parse_partition_assignment)(s)?;
    let (s, user_data) = match parser::parse_nullable_bytes(s.clone()) {
        Ok((s, user_data)) => (s, user_data),
        // trailing user data is optional on the wire
        Err(_) => (s, None),
    };

    Ok((
        s,
        MemberAssignment {
            version,
            partition_assignments,
            user_data,
        },
    ))
}

fn parse_partition_assignment(s: NomBytes) -> IResult<NomBytes, PartitionAssignment> {
    let (s, topic_name) = parser::parse_string(s)?;
    let (s, partitions) = parser::parse_array(nom::number::complete::be_i32)(s)?;

    Ok((
        s,
        PartitionAssignment {
            topic_name,
            partitions,
        },
    ))
}
