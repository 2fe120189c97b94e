//! Connection & communication with a broker.
//!
//! # Network Module
//!
//! Kafka uses a binary protocol over TCP. The protocol defines all APIs as
//! request response message pairs. All messages are size delimited and are
//! made up of the following primitive types.
//!
//! The client initiates a socket connection and then writes a sequence of
//! request messages and reads back the corresponding response message. No
//! handshake is required on connection or disconnection. TCP is happier if
//! you maintain persistent connections used for many requests to amortize
//! the cost of the TCP handshake, but beyond this penalty connecting is
//! pretty cheap.
//!
//! The server guarantees that on a single TCP connection, requests will
//! be processed in the order they are sent and responses will return in
//! that order as well. A connection here hands out one logical
//! request/response pair per [`BrokerConnection::send_request`] call and
//! serialises concurrent callers on the underlying stream, so interleaved
//! pairs cannot cross.
//!
//! The server has a configurable maximum limit on request size and any
//! request that exceeds this limit will result in the socket being
//! disconnected.

use std::fmt::Debug;
use std::time::Duration;

use crate::prelude::{encode::ToByte, Result};
use async_trait::async_trait;
use bytes::BytesMut;

pub mod sasl;
pub mod tcp;
pub mod tls;

/// How long a transport-level connect may take before we give up.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_millis(1000);

#[derive(Clone, Debug, PartialEq)]
pub struct BrokerAddress {
    pub host: String,
    pub port: u16,
}

impl std::fmt::Display for BrokerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// A framed transport to one broker.
///
/// Implementations own the socket lifecycle; the broker layer above
/// decides *when* to connect, disconnect, and authenticate. Handles are
/// cheaply cloneable and all clones share the same underlying stream.
#[async_trait]
pub trait BrokerConnection: Clone + Send + Sync {
    /// Establish the transport. A no-op on an already-connected handle.
    async fn connect(&self) -> Result<()>;

    /// Tear the transport down. Must always succeed promptly.
    async fn disconnect(&self);

    /// Whether the transport is currently up.
    fn connected(&self) -> bool;

    fn address(&self) -> BrokerAddress;

    fn connection_timeout(&self) -> Duration;

    /// Write one size-delimited request and read back its size-delimited
    /// response. Concurrent callers are serialised so pairs cannot
    /// interleave on the stream.
    async fn send_request<R: ToByte + Debug + Send + Sync>(&self, req: &R) -> Result<BytesMut>;
}
