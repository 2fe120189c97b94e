//! Parsing and processing for End Txn responses.
//!
//! ### Protocol Def
//! ```text
//! EndTxn Response (Version: 0-1) => throttle_time_ms error_code
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

/// The base End Txn response object.
#[derive(Debug, PartialEq)]
pub struct EndTxnResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota.
    pub throttle_time_ms: i32,
    /// The error code, or 0 if there was no error.
    pub error_code: KafkaCode,
}

impl TryFrom<Bytes> for EndTxnResponse {
    type Error = Error;

    fn try_from(s: Bytes) -> Result<Self> {
        tracing::trace!("Parsing EndTxnResponse {:?}", s);
        let (_, response) = parse_end_txn_response(NomBytes::new(s.clone())).map_err(|err| {
            tracing::error!("ERROR: Failed parsing EndTxnResponse {:?}", err);
            tracing::error!("ERROR: EndTxnResponse Bytes {:?}", s);
            Error::ParsingError(s)
        })?;
        tracing::trace!("Parsed EndTxnResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_end_txn_response(s: NomBytes) -> IResult<NomBytes, EndTxnResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = be_i32(s)?;
    let (s, error_code) = parser::parse_kafka_code(s)?;

    Ok((
        s,
        EndTxnResponse {
            header,
            throttle_time_ms,
            error_code,
        },
    ))
}
