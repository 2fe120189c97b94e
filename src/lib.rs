//! # Odradek
//! Rust-native client for the Apache Kafka broker protocol.
//!
//! This crate drives the full RPC surface of a single Kafka broker over
//! one long-lived TCP or TLS connection: metadata, produce, fetch,
//! consumer-group coordination, offsets, transactions, topic & config
//! administration, and ACLs. Users of this crate benefit from Rust all
//! the way down; meaning memory safety, safe concurrency, low resource
//! usage, and of course blazing speed.
//!
//! ## Goals
//! - Easy to understand code
//! - Leverage best in class libraries such as Tokio, Nom to do the heavy lifting
//! - Speak the best protocol version each broker supports, discovered at
//!   connect time
//! - Authenticate with SASL, and re-authenticate before the session
//!   expires, without the caller noticing
//! - Be a good building block for cluster-level clients: producers,
//!   consumers, admin tools
//!
//! ## Getting started
//!
//! The entry point is the [`Broker`](prelude::Broker): one instance per
//! cluster node, injected with a [`TcpConnection`](prelude::TcpConnection)
//! or [`TlsConnection`](prelude::TlsConnection).
//!
//! ```ignore
//! let conn = TcpConnection::new(BrokerAddress {
//!     host: "localhost".to_string(),
//!     port: 9092,
//! });
//! let broker = Broker::new(conn).client_id("my-service".to_string());
//!
//! // the first call connects, negotiates versions, and authenticates
//! let metadata = broker.metadata(vec!["my-topic".to_string()]).await?;
//! println!("{:?}", metadata.brokers);
//! ```
//!
//! With SASL credentials the same call additionally runs the handshake,
//! and later calls transparently redo it shortly before the
//! broker-advertised session lifetime runs out:
//!
//! ```ignore
//! let broker = Broker::new(conn)
//!     .sasl(SaslConfig::scram_sha_256("user".into(), "pass".into()));
//!
//! broker.produce(ProduceOptions::default(), messages).await?;
//! ```
//!
//! One broker client talks to one broker. Anything that spans the
//! cluster, like routing by partition leadership, refreshing metadata,
//! or retrying failed requests, belongs to the layer above.
//!
//! ## Resources
//! - [Kafka Protocol Spec](https://kafka.apache.org/protocol.html)
//! - [Confluence Docs](https://cwiki.apache.org/confluence/display/KAFKA/A+Guide+To+The+Kafka+Protocol)

mod broker;
mod encode;
mod error;
mod network;
mod parser;
mod protocol;
mod utils;
mod versions;

const DEFAULT_CLIENT_ID: &str = "odradek";

pub mod prelude {
    //! Main export of the crate's structures and methods.
    //!
    //! Start with a [`Broker`] wrapping a [`TcpConnection`] or
    //! [`TlsConnection`]. Every Kafka API is a method on the broker; the
    //! [`protocol`] module holds the raw request and response types for
    //! callers that want to drive the wire format directly.

    pub use crate::broker::{
        Broker, CommitPartition, CommitTopic, ConfigResource, ConfigUpdate, CreateOptions,
        DeleteRecordsTopic, FetchOptions, FetchPartition, FetchTopic, JoinGroupOptions, NewTopic,
        OffsetCommitOptions, OffsetsPartition, OffsetsTopic, ProduceMessage, ProduceOptions,
    };
    pub use crate::error::{Error, KafkaCode, Result};
    pub use crate::network::{
        sasl::{SaslConfig, SaslDialect, SaslSession},
        tcp::TcpConnection,
        tls::{TlsConnection, TlsConnectionOptions},
        BrokerAddress, BrokerConnection, DEFAULT_CONNECTION_TIMEOUT,
    };
    pub use crate::protocol::acl::{
        AclEntry, AclFilter, Operation, PatternType, PermissionType, ResourceType,
    };
    pub use crate::protocol::produce::request::Compression;
    pub use crate::versions::{RequestLookup, VersionRange};

    pub use bytes;

    pub mod encode {
        pub use crate::encode::*;
    }

    pub mod protocol {
        pub use crate::protocol::*;
    }
}
