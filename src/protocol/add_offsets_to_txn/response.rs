//! Parsing and processing for Add Offsets To Txn responses.
//!
//! ### Protocol Def
//! ```text
//! AddOffsetsToTxn Response (Version: 0-1) => throttle_time_ms error_code
//!   throttle_time_ms => INT32
//!   error_code => INT16
//! ```

use bytes::Bytes;
use nom::{number::complete::be_i32, IResult};
use nombytes::NomBytes;

use crate::{
    error::{Error, KafkaCode, Result},
    parser,
    protocol::{parse_header_response, HeaderResponse},
};

/// The base Add Offsets To Txn response object.
#[derive(Debug, PartialEq)]
pub struct AddOffsetsToTxnResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota.
    pub throttle_time_ms: i32,
    /// The response error code, or 0 if there was no error.
    pub error_code: KafkaCode,
}

impl TryFrom<Bytes> for AddOffsetsToTxnResponse {
    type Error = Error;

    fn try_from(s: Bytes) -> Result<Self> {
        tracing::trace!("Parsing AddOffsetsToTxnResponse {:?}", s);
        let (_, response) =
            parse_add_offsets_to_txn_response(NomBytes::new(s.clone())).map_err(|err| {
                tracing::error!("ERROR: Failed parsing AddOffsetsToTxnResponse {:?}", err);
                tracing::error!("ERROR: AddOffsetsToTxnResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed AddOffsetsToTxnResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_add_offsets_to_txn_response(
    s: NomBytes,
) -> IResult<NomBytes, AddOffsetsToTxnResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = be_i32(s)?;
    let (s, error_code) = parser::parse_kafka_code(s)?;

    Ok((
        s,
        AddOffsetsToTxnResponse {
            header,
            throttle_time_ms,
            error_code,
        },
    ))
}
