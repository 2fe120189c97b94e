use std::fs::File;
use std::io::BufReader;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;
use std::{fmt, io};

use async_trait::async_trait;
use bytes::BytesMut;
use rustls_pemfile::{certs, pkcs8_private_keys};
use rustls_pki_types::{CertificateDer, PrivateKeyDer};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_rustls::{client::TlsStream, rustls, TlsConnector};

use crate::{
    encode::ToByte,
    error::{Error, Result},
};

use super::{BrokerAddress, BrokerConnection, DEFAULT_CONNECTION_TIMEOUT};

/// Mutual-TLS connection to a Kafka/Redpanda broker.
///
/// Same lifecycle and framing discipline as the TCP transport, with the
/// stream wrapped in rustls.
#[derive(Clone)]
pub struct TlsConnection {
    options: TlsConnectionOptions,
    stream: Arc<Mutex<Option<TlsStream<TcpStream>>>>,
    connected: Arc<AtomicBool>,
}

impl fmt::Debug for TlsConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsConnection")
            .field("addr", &self.options.addr)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct TlsConnectionOptions {
    pub addr: BrokerAddress,
    /// Client certificate in PEM format.
    pub cert: PathBuf,
    /// PKCS8 client key in PEM format.
    pub key: PathBuf,
    /// CA bundle; the webpki roots are used when absent.
    pub cafile: Option<PathBuf>,
    pub connection_timeout: Duration,
}

impl TlsConnectionOptions {
    pub fn new(addr: BrokerAddress, cert: PathBuf, key: PathBuf) -> Self {
        Self {
            addr,
            cert,
            key,
            cafile: None,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
        }
    }
}

impl TlsConnection {
    pub fn new(options: TlsConnectionOptions) -> Self {
        Self {
            options,
            stream: Arc::new(Mutex::new(None)),
            connected: Arc::new(AtomicBool::new(false)),
        }
    }

    fn map_io(e: std::io::Error) -> Error {
        match e.kind() {
            ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof
            | ErrorKind::NotConnected => Error::ConnectionClosed,
            kind => Error::IoError(kind),
        }
    }

    async fn handshake(&self) -> Result<TlsStream<TcpStream>> {
        let options = &self.options;

        let mut root_cert_store = rustls::RootCertStore::empty();
        if let Some(cafile) = &options.cafile {
            let mut pem =
                BufReader::new(File::open(cafile).map_err(|e| Error::IoError(e.kind()))?);
            for cert in rustls_pemfile::certs(&mut pem) {
                root_cert_store
                    .add(cert.map_err(|e| Error::IoError(e.kind()))?)
                    .map_err(|_| Error::IoError(ErrorKind::InvalidData))?;
            }
        } else {
            root_cert_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        }

        let certs = load_certs(&options.cert).map_err(|e| Error::IoError(e.kind()))?;
        let key = load_keys(&options.key).map_err(|e| Error::IoError(e.kind()))?;

        tracing::debug!("Connecting to {}", options.addr);
        let tcp = tokio::time::timeout(
            options.connection_timeout,
            TcpStream::connect((options.addr.host.as_str(), options.addr.port)),
        )
        .await
        .map_err(|_| Error::IoError(ErrorKind::TimedOut))?
        .map_err(Self::map_io)?;

        let config = rustls::ClientConfig::builder()
            .with_root_certificates(root_cert_store)
            .with_client_auth_cert(certs, key)
            .map_err(|_| Error::IoError(ErrorKind::InvalidData))?;
        let connector = TlsConnector::from(Arc::new(config));

        let domain = rustls_pki_types::ServerName::try_from(options.addr.host.clone())
            .map_err(|_| Error::IoError(ErrorKind::InvalidInput))?
            .to_owned();

        connector.connect(domain, tcp).await.map_err(Self::map_io)
    }
}

fn load_certs(path: &Path) -> io::Result<Vec<CertificateDer<'static>>> {
    certs(&mut BufReader::new(File::open(path)?)).collect()
}

fn load_keys(path: &Path) -> io::Result<PrivateKeyDer<'static>> {
    pkcs8_private_keys(&mut BufReader::new(File::open(path)?))
        .next()
        .ok_or_else(|| io::Error::new(ErrorKind::InvalidData, "no pkcs8 key in file"))?
        .map(Into::into)
}

#[async_trait]
impl BrokerConnection for TlsConnection {
    async fn connect(&self) -> Result<()> {
        let mut guard = self.stream.lock().await;
        if guard.is_some() {
            return Ok(());
        }

        let stream = self.handshake().await?;
        tracing::debug!("tls connected to {}", self.options.addr);

        *guard = Some(stream);
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        let mut guard = self.stream.lock().await;
        if guard.take().is_some() {
            tracing::debug!("Disconnected from {}", self.options.addr);
        }
    }

    fn connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn address(&self) -> BrokerAddress {
        self.options.addr.clone()
    }

    fn connection_timeout(&self) -> Duration {
        self.options.connection_timeout
    }

    async fn send_request<R: ToByte + fmt::Debug + Send + Sync>(
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
                if matches!(err, Error::ConnectionClosed) {
                    guard.take();
                    self.connected.store(false, Ordering::SeqCst);
                }
                tracing::error!(
                    "ERROR: exchange with {} failed {:?}",
                    self.options.addr,
                    err
                );
                Err(err)
            }
        }
    }
}
