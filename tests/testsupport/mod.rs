#![allow(dead_code)]
//! A scripted stand-in for the broker side of the wire.
//!
//! The spy records every call and answers each request with the next
//! scripted reply, so tests can pin down exactly how many connects,
//! handshakes and requests a broker performs.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use odradek::prelude::{encode::ToByte, BrokerAddress, BrokerConnection, Error, Result};

#[derive(Debug)]
pub enum Reply {
    Frame(Vec<u8>),
    Error(Error),
}

#[derive(Debug)]
struct Inner {
    connected: AtomicBool,
    connect_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
    connect_delay: Option<Duration>,
    requests: Mutex<Vec<Vec<u8>>>,
    script: Mutex<VecDeque<Reply>>,
}

#[derive(Clone, Debug)]
pub struct SpyConnection {
    inner: Arc<Inner>,
}

impl SpyConnection {
    pub fn new(script: Vec<Reply>) -> Self {
        Self {
            inner: Arc::new(Inner {
                connected: AtomicBool::new(false),
                connect_calls: AtomicUsize::new(0),
                disconnect_calls: AtomicUsize::new(0),
                connect_delay: None,
                requests: Mutex::new(vec![]),
                script: Mutex::new(script.into()),
            }),
        }
    }

    /// Make `connect` take a while, to widen race windows.
    pub fn with_connect_delay(script: Vec<Reply>, delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                connected: AtomicBool::new(false),
                connect_calls: AtomicUsize::new(0),
                disconnect_calls: AtomicUsize::new(0),
                connect_delay: Some(delay),
                requests: Mutex::new(vec![]),
                script: Mutex::new(script.into()),
            }),
        }
    }

    pub fn push_replies(&self, replies: Vec<Reply>) {
        self.inner.script.lock().unwrap().extend(replies);
    }

    pub fn connect_calls(&self) -> usize {
        self.inner.connect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.inner.disconnect_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Vec<u8>> {
        self.inner.requests.lock().unwrap().clone()
    }

    /// How many captured requests carry the given api key.
    pub fn count_api(&self, api_key: i16) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.len() >= 2 && request_api_key(request) == api_key)
            .count()
    }
}

pub fn request_api_key(request: &[u8]) -> i16 {
    i16::from_be_bytes([request[0], request[1]])
}

pub fn request_api_version(request: &[u8]) -> i16 {
    i16::from_be_bytes([request[2], request[3]])
}

#[async_trait]
impl BrokerConnection for SpyConnection {
    async fn connect(&self) -> Result<()> {
        self.inner.connect_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.inner.connect_delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) {
        self.inner.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.connected.store(false, Ordering::SeqCst);
    }

    fn connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    fn address(&self) -> BrokerAddress {
        BrokerAddress {
            host: String::from("spy"),
            port: 9092,
        }
    }

    fn connection_timeout(&self) -> Duration {
        Duration::from_millis(1000)
    }

    async fn send_request<R: ToByte + Debug + Send + Sync>(&self, req: &R) -> Result<BytesMut> {
        let mut body = vec![];
        req.encode(&mut body).unwrap();
        self.inner.requests.lock().unwrap().push(body);

        let reply = self
            .inner
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("spy script ran dry");
        match reply {
            Reply::Frame(frame) => Ok(BytesMut::from(frame.as_slice())),
            Reply::Error(err) => {
                if matches!(err, Error::ConnectionClosed) {
                    self.inner.connected.store(false, Ordering::SeqCst);
                }
                Err(err)
            }
        }
    }
}

// ---- canned response frames ----------------------------------------

const CORRELATION_ID: i32 = 1;

/// The `UNSUPPORTED_VERSION` answer brokers give to an `ApiVersions`
/// probe they cannot parse; always a version 0 body.
pub fn api_versions_unsupported() -> Vec<u8> {
    let mut b = vec![];
    CORRELATION_ID.encode(&mut b).unwrap();
    35i16.encode(&mut b).unwrap();
    0i32.encode(&mut b).unwrap();
    b
}

/// A version <= 2 `ApiVersions` body advertising `(api_key, min, max)`
/// ranges.
pub fn api_versions_ok(entries: &[(i16, i16, i16)]) -> Vec<u8> {
    let mut b = vec![];
    CORRELATION_ID.encode(&mut b).unwrap();
    0i16.encode(&mut b).unwrap();
    (entries.len() as i32).encode(&mut b).unwrap();
    for (api_key, min, max) in entries {
        api_key.encode(&mut b).unwrap();
        min.encode(&mut b).unwrap();
        max.encode(&mut b).unwrap();
    }
    0i32.encode(&mut b).unwrap();
    b
}

/// The version table most tests run against.
pub fn default_api_table() -> Vec<u8> {
    api_versions_ok(&[
        (0, 0, 3),   // produce
        (1, 0, 11),  // fetch
        (2, 0, 1),   // list offsets
        (3, 0, 4),   // metadata
        (11, 0, 4),  // join group
        (12, 0, 1),  // heartbeat
        (17, 0, 1),  // sasl handshake
        (18, 0, 2),  // api versions
        (36, 0, 1),  // sasl authenticate
    ])
}

/// ApiVersions negotiation as seen from a broker topping out at v2:
/// one rejected probe, then the table.
pub fn negotiation() -> Vec<Reply> {
    vec![
        Reply::Frame(api_versions_unsupported()),
        Reply::Frame(default_api_table()),
    ]
}

pub fn sasl_handshake_ok() -> Vec<u8> {
    let mut b = vec![];
    CORRELATION_ID.encode(&mut b).unwrap();
    0i16.encode(&mut b).unwrap();
    1i32.encode(&mut b).unwrap();
    "PLAIN".encode(&mut b).unwrap();
    b
}

pub fn sasl_authenticate_ok(session_lifetime_ms: i64) -> Vec<u8> {
    let mut b = vec![];
    CORRELATION_ID.encode(&mut b).unwrap();
    0i16.encode(&mut b).unwrap();
    (-1i32).encode(&mut b).unwrap(); // null error message
    0i32.encode(&mut b).unwrap(); // empty auth bytes
    session_lifetime_ms.encode(&mut b).unwrap();
    b
}

/// A full PLAIN authentication: handshake + one token round-trip.
pub fn authentication(session_lifetime_ms: i64) -> Vec<Reply> {
    vec![
        Reply::Frame(sasl_handshake_ok()),
        Reply::Frame(sasl_authenticate_ok(session_lifetime_ms)),
    ]
}

/// A version 4 metadata body with no brokers and no topics.
pub fn metadata_empty() -> Vec<u8> {
    let mut b = vec![];
    CORRELATION_ID.encode(&mut b).unwrap();
    0i32.encode(&mut b).unwrap(); // throttle
    0i32.encode(&mut b).unwrap(); // no brokers
    (-1i16).encode(&mut b).unwrap(); // null cluster id
    (-1i32).encode(&mut b).unwrap(); // unknown controller
    0i32.encode(&mut b).unwrap(); // no topics
    b
}

/// A version 2-4 join group body.
pub fn join_group(error_code: i16, member_id: &str) -> Vec<u8> {
    let mut b = vec![];
    CORRELATION_ID.encode(&mut b).unwrap();
    0i32.encode(&mut b).unwrap(); // throttle
    error_code.encode(&mut b).unwrap();
    1i32.encode(&mut b).unwrap(); // generation
    "range".encode(&mut b).unwrap();
    "leader-1".encode(&mut b).unwrap();
    member_id.encode(&mut b).unwrap();
    0i32.encode(&mut b).unwrap(); // no members
    b
}

/// A version 11 fetch body with no topics.
pub fn fetch_empty() -> Vec<u8> {
    let mut b = vec![];
    CORRELATION_ID.encode(&mut b).unwrap();
    0i32.encode(&mut b).unwrap(); // throttle
    0i16.encode(&mut b).unwrap(); // error code
    0i32.encode(&mut b).unwrap(); // session id
    0i32.encode(&mut b).unwrap(); // no topics
    b
}
