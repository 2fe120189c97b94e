//! Parsing and processing for Add Partitions To Txn responses.
//!
//! ### Protocol Def
//! ```text
//! AddPartitionsToTxn Response (Version: 0-1) => throttle_time_ms [results]
//!   throttle_time_ms => INT32
//!   results => name [partition_results]
//!     name => STRING
//!     partition_results => partition_index error_code
//!       partition_index => INT32
//!       error_code => INT16
//! ```

use bytes::Bytes;
use nom::{number::complete::be_i32, IResult};
use nombytes::NomBytes;

use crate::{
    error::{Error, KafkaCode, Result},
    parser,
    protocol::{parse_header_response, HeaderResponse},
};

/// The base Add Partitions To Txn response object.
#[derive(Debug, PartialEq)]
pub struct AddPartitionsToTxnResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota.
    pub throttle_time_ms: i32,
    /// The results for each topic.
    pub results: Vec<Topic>,
}

/// The results for each topic.
#[derive(Debug, PartialEq)]
pub struct Topic {
    /// The topic name.
    pub name: Bytes,
    /// The results for each partition.
    pub results: Vec<Partition>,
}

/// The results for each partition.
#[derive(Debug, PartialEq)]
pub struct Partition {
    /// The partition indexes.
    pub partition_index: i32,
    /// The response error code, or 0 if there was no error.
    pub error_code: KafkaCode,
}

impl TryFrom<Bytes> for AddPartitionsToTxnResponse {
    type Error = Error;

    fn try_from(s: Bytes) -> Result<Self> {
        tracing::trace!("Parsing AddPartitionsToTxnResponse {:?}", s);
        let (_, response) =
            parse_add_partitions_to_txn_response(NomBytes::new(s.clone())).map_err(|err| {
                tracing::error!("ERROR: Failed parsing AddPartitionsToTxnResponse {:?}", err);
                tracing::error!("ERROR: AddPartitionsToTxnResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed AddPartitionsToTxnResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_add_partitions_to_txn_response(
    s: NomBytes,
) -> IResult<NomBytes, AddPartitionsToTxnResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = be_i32(s)?;
    let (s, results) = parser::parse_array(parse_topic)(s)?;

    Ok((
        s,
        AddPartitionsToTxnResponse {
            header,
            throttle_time_ms,
            results,
        },
    ))
}

fn parse_topic(s: NomBytes) -> IResult<NomBytes, Topic> {
    let (s, name) = parser::parse_string(s)?;
    let (s, results) = parser::parse_array(parse_partition)(s)?;

    Ok((s, Topic { name, results }))
}

fn parse_partition(s: NomBytes) -> IResult<NomBytes, Partition> {
    let (s, partition_index) = be_i32(s)?;
    let (s, error_code) = parser::parse_kafka_code(s)?;

    Ok((
        s,
        Partition {
            partition_index,
            error_code,
        },
    ))
}
