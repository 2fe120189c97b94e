//! SASL handshake orchestration.
//!
//! The mechanism exchange itself is rsasl's business; this module owns
//! the framing around it. Two dialects exist on the wire:
//!
//! - **framed** (KIP-152): every mechanism round-trip travels inside a
//!   `SaslAuthenticate` request/response pair, and the final response
//!   advertises the session lifetime used for re-authentication.
//! - **raw** (pre-KIP-152): the token bytes are written straight onto the
//!   socket with nothing but the usual size prefix, and no lifetime is
//!   ever advertised.
//!
//! The broker picks the dialect by probing its negotiated version table
//! for `SaslAuthenticate`; the handshake request version follows the
//! dialect (version 1 switched the token framing on).

use bytes::{BufMut, Bytes};
use rsasl::prelude::*;
use std::io::Cursor;

use crate::{
    encode::ToByte,
    error::{Error, KafkaCode, Result},
    network::BrokerConnection,
    protocol::{SaslAuthenticateRequest, SaslAuthenticateResponse, SaslHandshakeRequest,
        SaslHandshakeResponse},
};

/// SASL Credentials
#[derive(Clone)]
pub struct SaslConfig {
    /// Mechanism name as advertised to the broker, e.g. `PLAIN` or
    /// `SCRAM-SHA-256`.
    pub mechanism: String,
    pub username: String,
    pub password: String,
}

impl SaslConfig {
    pub fn new(mechanism: String, username: String, password: String) -> Self {
        Self {
            mechanism,
            username,
            password,
        }
    }

    pub fn plain(username: String, password: String) -> Self {
        Self::new(String::from("PLAIN"), username, password)
    }

    pub fn scram_sha_256(username: String, password: String) -> Self {
        Self::new(String::from("SCRAM-SHA-256"), username, password)
    }

    pub fn scram_sha_512(username: String, password: String) -> Self {
        Self::new(String::from("SCRAM-SHA-512"), username, password)
    }
}

impl std::fmt::Debug for SaslConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // never log credentials
        f.debug_struct("SaslConfig")
            .field("mechanism", &self.mechanism)
            .field("username", &self.username)
            .finish()
    }
}

/// How mechanism tokens travel once the handshake is done.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SaslDialect {
    /// Tokens wrapped in `SaslAuthenticate` at this version (KIP-152).
    Framed { version: i16 },
    /// Tokens written directly on the socket (pre-KIP-152 brokers).
    Raw,
}

impl SaslDialect {
    fn handshake_version(&self) -> i16 {
        match self {
            SaslDialect::Framed { .. } => 1,
            SaslDialect::Raw => 0,
        }
    }
}

/// A bare mechanism token. The transport adds the 4-byte size prefix,
/// which is the entire raw-dialect framing.
#[derive(Debug)]
struct RawSaslToken(Bytes);

impl ToByte for RawSaslToken {
    fn encode<W: BufMut>(&self, buffer: &mut W) -> Result<()> {
        buffer.put(self.0.as_ref());
        Ok(())
    }
}

/// The outcome of a completed SASL exchange.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaslSession {
    /// Number of milliseconds the broker will honour this session, or 0
    /// when the broker does not expire sessions.
    pub session_lifetime_ms: i64,
}

pub async fn sasl_handshake<T: BrokerConnection>(
    conn: &T,
    api_version: i16,
    correlation_id: i32,
    client_id: &str,
    mechanism: String,
) -> Result<SaslHandshakeResponse> {
    let handshake_request =
        SaslHandshakeRequest::new(api_version, correlation_id, client_id, mechanism);
    let handshake_response = conn.send_request(&handshake_request).await?;
    SaslHandshakeResponse::try_from(handshake_response.freeze())
}

/// Run the full handshake + mechanism exchange and report the session
/// lifetime the broker granted.
///
/// Failures are surfaced as-is; nothing at this layer retries a SASL
/// exchange.
pub async fn authenticate<T: BrokerConnection>(
    conn: &T,
    correlation_id: i32,
    client_id: &str,
    config: &SaslConfig,
    dialect: SaslDialect,
) -> Result<SaslSession> {
    let handshake_response = sasl_handshake(
        conn,
        dialect.handshake_version(),
        correlation_id,
        client_id,
        config.mechanism.clone(),
    )
    .await?;

    match handshake_response.error_code {
        KafkaCode::None => {}
        KafkaCode::UnsupportedSaslMechanism => {
            tracing::error!(
                "Mechanism {:?} not enabled on broker; server offers {:?}",
                config.mechanism,
                handshake_response.mechanisms
            );
            return Err(Error::InvalidSaslMechanism);
        }
        code => return Err(Error::KafkaError(code)),
    }

    let mut session = start_session(config)?;
    tracing::debug!("Using {:?} for our SASL mechanism", session.get_mechname());

    let mut data_in: Option<Vec<u8>> = None;
    let mut session_lifetime_ms = 0i64;

    // stepping the authentication exchange to completion
    loop {
        let mut out = Cursor::new(Vec::new());

        // each call to step writes the generated auth data into the provided writer.
        let state = session.step(data_in.as_deref(), &mut out).map_err(|e| {
            tracing::error!("{:?}", e);
            Error::SaslAuthFailed(format!("{e}"))
        })?;

        let token = Bytes::from(out.into_inner());

        let auth_bytes = match dialect {
            SaslDialect::Framed { version } => {
                let request =
                    SaslAuthenticateRequest::new(version, correlation_id, client_id, token);
                let response = conn.send_request(&request).await?;
                let response = SaslAuthenticateResponse::parse(response.freeze(), version)?;

                match response.error_code {
                    KafkaCode::None => {}
                    KafkaCode::SaslAuthenticationFailed => {
                        let msg = response
                            .error_message
                            .map(|x| String::from_utf8_lossy(&x).into_owned())
                            .unwrap_or_default();
                        tracing::error!("auth failed: {:?}", msg);
                        return Err(Error::SaslAuthFailed(msg));
                    }
                    code => return Err(Error::KafkaError(code)),
                }

                session_lifetime_ms = response.session_lifetime_ms;
                response.auth_bytes
            }
            SaslDialect::Raw => {
                let response = conn.send_request(&RawSaslToken(token)).await?;
                response.freeze()
            }
        };

        data_in = if auth_bytes.is_empty() {
            None
        } else {
            Some(auth_bytes.to_vec())
        };

        if data_in.is_none() && state.is_finished() {
            break;
        }
    }

    tracing::debug!(
        "SASL exchange complete, session lifetime {} ms",
        session_lifetime_ms
    );
    Ok(SaslSession {
        session_lifetime_ms,
    })
}

fn start_session(config: &SaslConfig) -> Result<Session> {
    let sasl_config = SASLConfig::with_credentials(
        None,
        config.username.clone(),
        config.password.clone(),
    )
    .map_err(|e| {
        tracing::error!("{:?}", e);
        Error::InvalidSaslMechanism
    })?;

    let mechanism = Mechname::parse(config.mechanism.as_bytes()).map_err(|e| {
        tracing::error!("{:?}", e);
        Error::InvalidSaslMechanism
    })?;

    SASLClient::new(sasl_config)
        .start_suggested(&[mechanism])
        .map_err(|e| {
            tracing::error!("{:?}", e);
            Error::InvalidSaslMechanism
        })
}
