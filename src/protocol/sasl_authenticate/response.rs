//! Parsing and processing for SASL Authenticate responses.
//!
//! ### Protocol Defs
//! ```text
//! SaslAuthenticate Response (Version: 0) => error_code error_message auth_bytes
//! SaslAuthenticate Response (Version: 1) => error_code error_message auth_bytes session_lifetime_ms
//!   error_code => INT16
//!   error_message => NULLABLE_STRING
//!   auth_bytes => BYTES
//!   session_lifetime_ms => INT64
//! ```

use bytes::Bytes;
use nom::{number::complete::be_i64, IResult};
use nombytes::NomBytes;

use crate::{
    error::{Error, KafkaCode, Result},
    parser,
    protocol::{parse_header_response, HeaderResponse},
};

/// The base SASL Authenticate response object.
#[derive(Debug, PartialEq)]
pub struct SaslAuthenticateResponse {
    pub header: HeaderResponse,
    /// The error code, or 0 if there was no error.
    pub error_code: KafkaCode,
    /// The error message, or null if there was no error.
    pub error_message: Option<Bytes>,
    /// The SASL authentication bytes from the server, as defined by the SASL mechanism.
    pub auth_bytes: Bytes,
    /// Number of milliseconds after which only re-authentication over the
    /// existing connection to create a new session can occur. 0 when the
    /// server does not expire sessions (and always 0 in version 0).
    pub session_lifetime_ms: i64,
}

impl SaslAuthenticateResponse {
    pub fn parse(s: Bytes, api_version: i16) -> Result<Self> {
        tracing::trace!("Parsing SaslAuthenticateResponse {:?}", s);
        let (_, authenticate) = parse_authenticate_response(NomBytes::new(s.clone()), api_version)
            .map_err(|err| {
                tracing::error!("ERROR: Failed parsing SaslAuthenticateResponse {:?}", err);
                tracing::error!("ERROR: SaslAuthenticateResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed SaslAuthenticateResponse {:?}", authenticate);
        Ok(authenticate)
    }
}

pub fn parse_authenticate_response(
    s: NomBytes,
    api_version: i16,
) -> IResult<NomBytes, SaslAuthenticateResponse> {
    let (s, header) = parse_header_response(s)?;
    let (s, error_code) = parser::parse_kafka_code(s)?;
    let (s, error_message) = parser::parse_nullable_bytes(s)?;
    let (s, auth_bytes) = parser::parse_bytes(s)?;
    let (s, session_lifetime_ms) = if api_version >= 1 { be_i64(s)? } else { (s, 0) };

    Ok((
        s,
        SaslAuthenticateResponse {
            header,
            error_code,
            error_message,
            auth_bytes,
            session_lifetime_ms,
        },
    ))
}
