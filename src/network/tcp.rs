use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::{
    encode::ToByte,
    error::{Error, Result},
};

use super::{BrokerAddress, BrokerConnection, DEFAULT_CONNECTION_TIMEOUT};

/// Reference counted TCP connection to a Kafka/Redpanda broker.
///
/// The handle starts out disconnected; the broker layer drives
/// `connect`/`disconnect`. Clones share one stream, and each
/// `send_request` call holds the stream for its full request/response
/// pair so concurrent callers cannot interleave frames.
#[derive(Clone, Debug)]
pub struct TcpConnection {
    addr: BrokerAddress,
    connection_timeout: Duration,
    stream: Arc<Mutex<Option<TcpStream>>>,
    connected: Arc<AtomicBool>,
}

impl TcpConnection {
    /// Create a disconnected handle for the given broker.
    ///
    /// ### Example
    /// ```ignore
    /// let addr = BrokerAddress { host: "localhost".to_string(), port: 9092 };
    /// let conn = TcpConnection::new(addr);
    /// conn.connect().await?;
    /// ```
    pub fn new(addr: BrokerAddress) -> Self {
        Self {
            addr,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            stream: Arc::new(Mutex::new(None)),
            connected: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn connection_timeout_ms(mut self, connection_timeout_ms: u64) -> Self {
        self.connection_timeout = Duration::from_millis(connection_timeout_ms);
        self
    }

    fn map_io(e: std::io::Error) -> Error {
        use std::io::ErrorKind;
        match e.kind() {
            ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof
            | ErrorKind::NotConnected => Error::ConnectionClosed,
            kind => Error::IoError(kind),
        }
    }
}

#[async_trait]
impl BrokerConnection for TcpConnection {
    #[instrument(name = "tcp-connect", level = "debug", skip(self))]
    async fn connect(&self) -> Result<()> {
        let mut guard = self.stream.lock().await;
        if guard.is_some() {
            return Ok(());
        }

        tracing::debug!("Connecting to {}", self.addr);
        let stream = tokio::time::timeout(
            self.connection_timeout,
            TcpStream::connect((self.addr.host.as_str(), self.addr.port)),
        )
        .await
        .map_err(|_| Error::IoError(std::io::ErrorKind::TimedOut))?
        .map_err(Self::map_io)?;

        *guard = Some(stream);
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        let mut guard = self.stream.lock().await;
        if guard.take().is_some() {
            tracing::debug!("Disconnected from {}", self.addr);
        }
    }

    fn connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn address(&self) -> BrokerAddress {
        self.addr.clone()
    }

    fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    #[instrument(name = "tcp-exchange", level = "trace", skip_all)]
    async fn send_request<R: ToByte + std::fmt::Debug + Send + Sync>(
        &self,
        req: &R,
    ) -> Result<BytesMut> {
        let mut buffer = Vec::with_capacity(4);

        buffer.extend_from_slice(&[0, 0, 0, 0]);
        req.encode(&mut buffer)?;

        let size = buffer.len() as i32 - 4;
        size.encode(&mut &mut buffer[..])?;

        let mut guard = self.stream.lock().await;
        let stream = guard.as_mut().ok_or(Error::ConnectionClosed)?;

        tracing::trace!("Sending bytes {}", buffer.len());
        let exchange = async {
            stream.write_all(&buffer).await.map_err(Self::map_io)?;

            let length = stream.read_u32().await.map_err(Self::map_io)?;
            tracing::trace!("Reading {} bytes", length);

            let mut response = BytesMut::zeroed(length as usize);
            stream.read_exact(&mut response).await.map_err(Self::map_io)?;
            Ok(response)
        };

        match exchange.await {
            Ok(response) => Ok(response),
            Err(err) => {
                // a half-finished exchange poisons the framing
                if matches!(err, Error::ConnectionClosed) {
                    guard.take();
                    self.connected.store(false, Ordering::SeqCst);
                }
                tracing::error!("ERROR: exchange with {} failed {:?}", self.addr, err);
                Err(err)
            }
        }
    }
}
