//! Parsing and processing for Init Producer Id responses.
//!
//! ### Protocol Def
//! ```text
//! InitProducerId Response (Version: 0-1) => throttle_time_ms error_code producer_id producer_epoch
//!   throttle_time_ms => INT32
//!   error_code => INT16
//!   producer_id => INT64
//!   producer_epoch => INT16
//! ```

use bytes::Bytes;
use nom::{
    number::complete::{be_i16, be_i32, be_i64},
    IResult,
};
use nombytes::NomBytes;

use crate::{
    error::{Error, KafkaCode, Result},
    parser,
    protocol::{parse_header_response, HeaderResponse},
};

/// The base Init Producer Id response object.
#[derive(Debug, PartialEq)]
pub struct InitProducerIdResponse {
    pub header: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota.
    pub throttle_time_ms: i32,
    /// The error code, or 0 if there was no error.
    pub error_code: KafkaCode,
    /// The current producer id.
    pub producer_id: i64,
    /// The current epoch associated with the producer id.
    pub producer_epoch: i16,
}

impl TryFrom<Bytes> for InitProducerIdResponse {
    type Error = Error;

    fn try_from(s: Bytes) -> Result<Self> {
        tracing::trace!("Parsing InitProducerIdResponse {:?}", s);
        let (_, response) =
            parse_init_producer_id_response(NomBytes::new(s.clone())).map_err(|err| {
                tracing::error!("ERROR: Failed parsing InitProducerIdResponse {:?}", err);
                tracing::error!("ERROR: InitProducerIdResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed InitProducerIdResponse {:?}", response);
        Ok(response)
    }
}

pub fn parse_init_producer_id_response(s: NomBytes) -> IResult<NomBytes, InitProducerIdResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, throttle_time_ms) = be_i32(s)?;
    let (s, error_code) = parser::parse_kafka_code(s)?;
    let (s, producer_id) = be_i64(s)?;
    let (s, producer_epoch) = be_i16(s)?;

    Ok((
        s,
        InitProducerIdResponse {
            header,
            throttle_time_ms,
            error_code,
            producer_id,
            producer_epoch,
        },
    ))
}
