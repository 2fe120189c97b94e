//! RPC client for a single broker.
//!
//! A [`Broker`] owns one connection to one cluster node and exposes every
//! broker API as a typed async method. Before the first request goes out
//! it brings the connection up, negotiates the protocol version for each
//! API through `ApiVersions`, and runs SASL when credentials are
//! configured. Authenticated sessions carry a broker-advertised lifetime;
//! the next request inside the re-authentication threshold of expiry
//! transparently redoes the SASL exchange.
//!
//! Higher layers own everything cluster shaped: one `Broker` never
//! retries failed requests, refreshes metadata, pools connections, or
//! routes by partition leadership.
//!
//! ### Example
//! ```ignore
//! let conn = TcpConnection::new(BrokerAddress {
//!     host: "localhost".to_string(),
//!     port: 9092,
//! });
//! let broker = Broker::new(conn);
//!
//! let metadata = broker.metadata(vec!["my-topic".to_string()]).await?;
//! ```

use std::fmt::Debug;
use std::sync::{
    atomic::{AtomicI32, Ordering},
    RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use std::time::Duration;

use bytes::Bytes;
use rand::{seq::SliceRandom, thread_rng};
use tokio::time::Instant;

use crate::{
    encode::ToByte,
    error::{Error, KafkaCode, Result},
    network::{
        sasl::{self, SaslConfig, SaslDialect},
        BrokerConnection,
    },
    protocol::{
        self, acl::{AclEntry, AclFilter}, api_keys, find_coordinator::COORDINATOR_TYPE_GROUP,
        produce::request::Compression,
    },
    versions::{self, RequestLookup},
    DEFAULT_CLIENT_ID,
};

const DEFAULT_AUTHENTICATION_TIMEOUT: Duration = Duration::from_millis(1000);
const DEFAULT_REAUTHENTICATION_THRESHOLD: Duration = Duration::from_millis(10000);
const DEFAULT_ADMIN_TIMEOUT_MS: i32 = 5000;

/// Everything the broker resolves at connect time, guarded by the
/// connect lock for writes.
#[derive(Debug, Default)]
struct BrokerState {
    /// The negotiated version table. `None` until the first successful
    /// `connect()`, which also makes every premature dispatch fail with
    /// [`Error::BrokerNotConnected`].
    lookup: Option<RequestLookup>,
    /// When the current SASL session was established.
    authenticated_at: Option<Instant>,
    /// Broker-advertised session lifetime; 0 means no expiry.
    session_lifetime_ms: i64,
    /// Whether the broker accepts `SaslAuthenticate` framing. Resolved
    /// once on first connect and never re-probed.
    supports_authentication_protocol: Option<bool>,
}

/// A client for one Kafka broker.
///
/// Methods take `&self`; the connection multiplexes request/response
/// pairs, so independent RPCs may run concurrently on one broker.
/// Connect, version negotiation and SASL are serialised behind a timed
/// mutex so that racing first-callers perform the expensive bring-up
/// exactly once.
#[derive(Debug)]
pub struct Broker<T: BrokerConnection> {
    connection: T,
    node_id: Option<i32>,
    client_id: String,
    sasl: Option<SaslConfig>,
    authentication_timeout: Duration,
    reauthentication_threshold: Duration,
    allow_auto_topic_creation: bool,
    correlation_id: AtomicI32,
    lock: tokio::sync::Mutex<()>,
    state: RwLock<BrokerState>,
}

impl<T: BrokerConnection> Broker<T> {
    pub fn new(connection: T) -> Self {
        Self {
            connection,
            node_id: None,
            client_id: DEFAULT_CLIENT_ID.to_owned(),
            sasl: None,
            authentication_timeout: DEFAULT_AUTHENTICATION_TIMEOUT,
            reauthentication_threshold: DEFAULT_REAUTHENTICATION_THRESHOLD,
            allow_auto_topic_creation: true,
            correlation_id: AtomicI32::new(1),
            lock: tokio::sync::Mutex::new(()),
            state: RwLock::new(BrokerState::default()),
        }
    }

    pub fn node_id(mut self, node_id: i32) -> Self {
        self.node_id = Some(node_id);
        self
    }

    pub fn client_id(mut self, client_id: String) -> Self {
        self.client_id = client_id;
        self
    }

    pub fn sasl(mut self, config: SaslConfig) -> Self {
        self.sasl = Some(config);
        self
    }

    pub fn authentication_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.authentication_timeout = Duration::from_millis(timeout_ms);
        self
    }

    pub fn reauthentication_threshold_ms(mut self, threshold_ms: u64) -> Self {
        self.reauthentication_threshold = Duration::from_millis(threshold_ms);
        self
    }

    pub fn allow_auto_topic_creation(mut self, allow: bool) -> Self {
        self.allow_auto_topic_creation = allow;
        self
    }

    pub fn id(&self) -> Option<i32> {
        self.node_id
    }

    pub fn address(&self) -> String {
        self.connection.address().to_string()
    }

    fn next_correlation_id(&self) -> i32 {
        self.correlation_id.fetch_add(1, Ordering::Relaxed)
    }

    fn state(&self) -> RwLockReadGuard<'_, BrokerState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, BrokerState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether requests can go out without another `connect()` round.
    ///
    /// On a SASL-configured broker this also demands a live session that
    /// is not about to expire, so the first request past the
    /// re-authentication threshold re-enters `connect()` on its own.
    pub fn is_connected(&self) -> bool {
        if !self.connection.connected() {
            return false;
        }
        if self.sasl.is_none() {
            return true;
        }

        let state = self.state();
        state.authenticated_at.is_some()
            && !should_reauthenticate(
                state.session_lifetime_ms,
                self.reauthentication_threshold.as_millis() as i64,
                state.authenticated_at.map(|at| at.elapsed().as_millis() as i64),
            )
    }

    /// Bring the broker up: transport, version negotiation, SASL.
    ///
    /// Safe to call concurrently; losers of the race observe
    /// `is_connected()` under the lock and return without repeating any
    /// work. Holding the lock for the whole sequence also keeps
    /// re-authentication from racing user requests into a half-built
    /// session.
    pub async fn connect(&self) -> Result<()> {
        let lock_timeout = 2 * self.connection.connection_timeout() + self.authentication_timeout;
        let _guard = tokio::time::timeout(lock_timeout, self.lock.lock())
            .await
            .map_err(|_| Error::ConnectionLockTimeout(self.address()))?;

        if self.is_connected() {
            tracing::debug!("Broker {} connected by a concurrent caller", self.address());
            return Ok(());
        }

        self.state_mut().authenticated_at = None;

        self.connection.connect().await?;

        if self.state().lookup.is_none() {
            let lookup = versions::negotiate(
                &self.connection,
                self.next_correlation_id(),
                &self.client_id,
            )
            .await?;
            self.state_mut().lookup = Some(lookup);
        }

        if self.state().supports_authentication_protocol.is_none() {
            let supported = self
                .state()
                .lookup
                .as_ref()
                .map(|lookup| {
                    lookup.supports(
                        api_keys::SASL_AUTHENTICATE,
                        protocol::sasl_authenticate::VERSIONS,
                    )
                })
                .unwrap_or(false);
            tracing::debug!(
                "Broker {} {} SaslAuthenticate framing",
                self.address(),
                if supported { "supports" } else { "does not support" }
            );
            self.state_mut().supports_authentication_protocol = Some(supported);
        }

        if self.sasl.is_some() && self.state().authenticated_at.is_none() {
            self.authenticate().await?;
        }

        Ok(())
    }

    /// Tear the connection down and forget the SASL session.
    ///
    /// Never takes the connect lock; a disconnect must always complete
    /// promptly, even mid-connect from another task.
    pub async fn disconnect(&self) {
        self.state_mut().authenticated_at = None;
        self.connection.disconnect().await;
    }

    // Callers hold the connect lock.
    async fn authenticate(&self) -> Result<()> {
        let config = self.sasl.as_ref().ok_or(Error::MissingSaslConfig)?;

        let dialect = if self.state().supports_authentication_protocol == Some(true) {
            let version = self.api_version(
                api_keys::SASL_AUTHENTICATE,
                protocol::sasl_authenticate::VERSIONS,
            )?;
            SaslDialect::Framed { version }
        } else {
            SaslDialect::Raw
        };

        let session = sasl::authenticate(
            &self.connection,
            self.next_correlation_id(),
            &self.client_id,
            config,
            dialect,
        )
        .await?;

        let mut state = self.state_mut();
        state.authenticated_at = Some(Instant::now());
        state.session_lifetime_ms = session.session_lifetime_ms;
        Ok(())
    }

    async fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            self.connect().await?;
        }
        Ok(())
    }

    /// Resolve the wire version for an API, or fail loudly when the
    /// broker was never connected or cannot speak any version we
    /// implement.
    fn api_version(&self, api_key: i16, implemented: &[i16]) -> Result<i16> {
        match &self.state().lookup {
            Some(lookup) => lookup.version_for(api_key, implemented),
            None => Err(Error::BrokerNotConnected),
        }
    }

    /// One request/response exchange. A connection-closed failure clears
    /// the authentication state so the next request reconnects and, when
    /// needed, re-authenticates from scratch.
    async fn send_request<R: ToByte + Debug + Send + Sync>(&self, request: &R) -> Result<Bytes> {
        match self.connection.send_request(request).await {
            Ok(response) => Ok(response.freeze()),
            Err(err) if err.is_connection_closed() => {
                tracing::error!("Connection to {} closed mid-request", self.address());
                self.disconnect().await;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}

/// Whether a new SASL exchange is required before the next request.
///
/// Pure on its inputs so the clock stays out of the way: `elapsed_ms` is
/// `None` when no session was ever established. The `>=` keeps us
/// re-authenticating when we are within the threshold of expiry or past
/// it.
fn should_reauthenticate(
    session_lifetime_ms: i64,
    reauthentication_threshold_ms: i64,
    elapsed_ms: Option<i64>,
) -> bool {
    if session_lifetime_ms == 0 {
        return false;
    }
    match elapsed_ms {
        None => true,
        Some(elapsed) => elapsed + reauthentication_threshold_ms >= session_lifetime_ms,
    }
}

/// A message headed for a topic partition.
#[derive(Clone, Debug)]
pub struct ProduceMessage {
    pub topic: String,
    pub partition_id: i32,
    pub key: Option<Bytes>,
    pub value: Option<Bytes>,
    pub headers: Vec<protocol::produce::request::Header>,
}

/// Tunables for [`Broker::produce`].
#[derive(Clone, Debug)]
pub struct ProduceOptions {
    /// -1 waits for the full ISR, 1 for the leader only, 0 for nothing.
    pub acks: i16,
    pub timeout_ms: i32,
    pub compression: Compression,
    pub transactional_id: Option<String>,
    pub producer_id: i64,
    pub producer_epoch: i16,
}

impl Default for ProduceOptions {
    fn default() -> Self {
        Self {
            acks: -1,
            timeout_ms: 30000,
            compression: Compression::None,
            transactional_id: None,
            producer_id: -1,
            producer_epoch: 0,
        }
    }
}

/// One topic worth of partitions to fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchTopic {
    pub topic: String,
    pub partitions: Vec<FetchPartition>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FetchPartition {
    pub partition: i32,
    /// -1 when the leader epoch is unknown.
    pub current_leader_epoch: i32,
    pub fetch_offset: i64,
    /// -1 for consumers; only followers report a log start offset.
    pub log_start_offset: i64,
    pub max_bytes: i32,
}

impl Default for FetchPartition {
    fn default() -> Self {
        Self {
            partition: 0,
            current_leader_epoch: -1,
            fetch_offset: 0,
            log_start_offset: -1,
            max_bytes: 1048576,
        }
    }
}

/// Tunables for [`Broker::fetch`].
#[derive(Clone, Debug)]
pub struct FetchOptions {
    pub max_wait_ms: i32,
    pub min_bytes: i32,
    pub max_bytes: i32,
    /// READ_UNCOMMITTED = 0, READ_COMMITTED = 1.
    pub isolation_level: i8,
    pub rack_id: String,
    pub session_id: i32,
    pub session_epoch: i32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_wait_ms: 5000,
            min_bytes: 1,
            max_bytes: 10485760,
            isolation_level: 1,
            rack_id: String::new(),
            session_id: 0,
            session_epoch: -1,
        }
    }
}

/// One topic worth of partition/timestamp probes for
/// [`Broker::list_offsets`].
#[derive(Clone, Debug)]
pub struct OffsetsTopic {
    pub topic: String,
    pub partitions: Vec<OffsetsPartition>,
}

#[derive(Clone, Debug)]
pub struct OffsetsPartition {
    pub partition: i32,
    /// -1 asks for the latest offset, -2 for the earliest.
    pub timestamp: i64,
}

/// One topic worth of offsets for [`Broker::offset_commit`] and
/// [`Broker::txn_offset_commit`].
#[derive(Clone, Debug)]
pub struct CommitTopic {
    pub topic: String,
    pub partitions: Vec<CommitPartition>,
}

#[derive(Clone, Debug)]
pub struct CommitPartition {
    pub partition: i32,
    pub offset: i64,
    pub metadata: Option<String>,
}

/// Tunables for [`Broker::offset_commit`].
#[derive(Clone, Debug)]
pub struct OffsetCommitOptions {
    /// -1 for a simple consumer outside a group generation.
    pub generation_id: i32,
    /// Empty for a simple consumer.
    pub member_id: Bytes,
    /// -1 keeps the broker's configured retention.
    pub retention_time_ms: i64,
}

impl Default for OffsetCommitOptions {
    fn default() -> Self {
        Self {
            generation_id: -1,
            member_id: Bytes::new(),
            retention_time_ms: -1,
        }
    }
}

/// Tunables for [`Broker::join_group`].
#[derive(Clone, Debug)]
pub struct JoinGroupOptions {
    pub session_timeout_ms: i32,
    pub rebalance_timeout_ms: i32,
    /// Empty on first join; the coordinator hands out the real id.
    pub member_id: Bytes,
    pub protocol_type: String,
}

impl Default for JoinGroupOptions {
    fn default() -> Self {
        Self {
            session_timeout_ms: 30000,
            rebalance_timeout_ms: 60000,
            member_id: Bytes::new(),
            protocol_type: String::from("consumer"),
        }
    }
}

/// A topic to create through [`Broker::create_topics`].
#[derive(Clone, Debug)]
pub struct NewTopic {
    pub name: String,
    pub num_partitions: i32,
    pub replication_factor: i16,
}

/// Tunables for [`Broker::create_topics`] and
/// [`Broker::create_partitions`].
#[derive(Clone, Debug)]
pub struct CreateOptions {
    pub timeout_ms: i32,
    pub validate_only: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_ADMIN_TIMEOUT_MS,
            validate_only: false,
        }
    }
}

/// A config resource selector for [`Broker::describe_configs`].
#[derive(Clone, Debug)]
pub struct ConfigResource {
    pub resource_type: i8,
    pub name: String,
    /// Empty lists every key.
    pub config_names: Vec<String>,
}

/// A config resource update for [`Broker::alter_configs`].
#[derive(Clone, Debug)]
pub struct ConfigUpdate {
    pub resource_type: i8,
    pub name: String,
    pub entries: Vec<(String, Option<String>)>,
}

/// One topic worth of deletion floors for [`Broker::delete_records`].
#[derive(Clone, Debug)]
pub struct DeleteRecordsTopic {
    pub topic: String,
    /// `(partition, offset)`; everything below the offset is deleted.
    pub partitions: Vec<(i32, i64)>,
}

impl<T: BrokerConnection> Broker<T> {
    /// Send messages to the broker.
    pub async fn produce(
        &self,
        options: ProduceOptions,
        messages: Vec<ProduceMessage>,
    ) -> Result<protocol::ProduceResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(api_keys::PRODUCE, protocol::produce::VERSIONS)?;

        let mut request = protocol::ProduceRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            options.acks,
            options.timeout_ms,
            options.compression,
            options.transactional_id.clone(),
            options.producer_id,
            options.producer_epoch,
        );
        for message in messages.iter() {
            request.add(
                &message.topic,
                message.partition_id,
                protocol::produce::request::Message::new(
                    message.key.clone(),
                    message.value.clone(),
                    message.headers.clone(),
                ),
            );
        }

        let response = self.send_request(&request).await?;
        protocol::ProduceResponse::try_from(response)
    }

    /// Fetch a batch of messages.
    ///
    /// The caller's topic list is flattened, shuffled, and re-grouped
    /// before dispatch (KIP-74): under `max_bytes` pressure the broker
    /// fills the response in request order, and a fixed order would
    /// starve the trailing partitions on every fetch.
    pub async fn fetch(
        &self,
        options: FetchOptions,
        topics: Vec<FetchTopic>,
    ) -> Result<protocol::FetchResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(api_keys::FETCH, protocol::fetch::VERSIONS)?;

        let interleaved = interleave_topics(topics);

        let mut request = protocol::FetchRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            options.max_wait_ms,
            options.min_bytes,
            options.max_bytes,
            options.isolation_level,
        );
        request.session_id = options.session_id;
        request.session_epoch = options.session_epoch;
        request.rack_id = &options.rack_id;
        for topic in interleaved.iter() {
            request.push_topic(protocol::fetch::request::TopicPartition {
                topic_name: &topic.topic,
                partitions: topic
                    .partitions
                    .iter()
                    .map(|p| protocol::fetch::request::Partition {
                        partition_index: p.partition,
                        current_leader_epoch: p.current_leader_epoch,
                        offset: p.fetch_offset,
                        log_start_offset: p.log_start_offset,
                        max_bytes: p.max_bytes,
                    })
                    .collect(),
            });
        }

        let response = self.send_request(&request).await?;
        protocol::FetchResponse::parse(response, version)
    }

    /// Fetch topic & cluster metadata.
    ///
    /// Topics are shuffled for the same fairness reason as `fetch`.
    pub async fn metadata(&self, topics: Vec<String>) -> Result<protocol::MetadataResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(api_keys::METADATA, protocol::metadata::VERSIONS)?;

        let mut topics = topics;
        topics.shuffle(&mut thread_rng());

        let request = protocol::MetadataRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            &topics,
            self.allow_auto_topic_creation,
        );

        let response = self.send_request(&request).await?;
        protocol::MetadataResponse::parse(response, version)
    }

    /// Find the offsets preceding a timestamp for a set of partitions.
    pub async fn list_offsets(
        &self,
        topics: Vec<OffsetsTopic>,
    ) -> Result<protocol::ListOffsetsResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(api_keys::LIST_OFFSETS, protocol::list_offsets::VERSIONS)?;

        let mut request = protocol::ListOffsetsRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            -1,
        );
        for topic in topics.iter() {
            for partition in topic.partitions.iter() {
                request.add(&topic.topic, partition.partition, partition.timestamp);
            }
        }

        let response = self.send_request(&request).await?;
        protocol::ListOffsetsResponse::parse(response, version)
    }

    /// Commit a set of offsets for a group.
    pub async fn offset_commit(
        &self,
        group_id: &str,
        options: OffsetCommitOptions,
        topics: Vec<CommitTopic>,
    ) -> Result<protocol::OffsetCommitResponse> {
        self.ensure_connected().await?;
        let version =
            self.api_version(api_keys::OFFSET_COMMIT, protocol::offset_commit::VERSIONS)?;

        let mut request = protocol::OffsetCommitRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            group_id,
            options.generation_id,
            options.member_id.clone(),
            options.retention_time_ms,
        )?;
        for topic in topics.iter() {
            for partition in topic.partitions.iter() {
                request.add(
                    &topic.topic,
                    partition.partition,
                    partition.offset,
                    partition.metadata.as_deref(),
                );
            }
        }

        let response = self.send_request(&request).await?;
        protocol::OffsetCommitResponse::try_from(response)
    }

    /// Fetch the committed offsets of a group.
    pub async fn offset_fetch(
        &self,
        group_id: &str,
        topics: Vec<(String, Vec<i32>)>,
    ) -> Result<protocol::OffsetFetchResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(api_keys::OFFSET_FETCH, protocol::offset_fetch::VERSIONS)?;

        let mut request = protocol::OffsetFetchRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            group_id,
        );
        for (topic, partitions) in topics.iter() {
            for partition in partitions.iter() {
                request.add(topic, *partition);
            }
        }

        let response = self.send_request(&request).await?;
        protocol::OffsetFetchResponse::try_from(response)
    }

    /// Keep a group member alive.
    pub async fn heartbeat(
        &self,
        group_id: &str,
        generation_id: i32,
        member_id: Bytes,
    ) -> Result<protocol::HeartbeatResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(api_keys::HEARTBEAT, protocol::heartbeat::VERSIONS)?;

        let request = protocol::HeartbeatRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            group_id,
            generation_id,
            member_id,
        )?;

        let response = self.send_request(&request).await?;
        protocol::HeartbeatResponse::parse(response, version)
    }

    /// Become a member of a group, creating it if there are no active
    /// members.
    ///
    /// A coordinator on version 4+ answers a first-time joiner with
    /// `MEMBER_ID_REQUIRED` and a reserved member id; the join is retried
    /// exactly once with that id. A second `MEMBER_ID_REQUIRED` surfaces
    /// as [`Error::MemberIdRequired`]; any other coordinator error rides
    /// back on the response payload.
    pub async fn join_group(
        &self,
        group_id: &str,
        options: JoinGroupOptions,
        protocols: Vec<protocol::join_group::request::Protocol<'_>>,
    ) -> Result<protocol::JoinGroupResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(api_keys::JOIN_GROUP, protocol::join_group::VERSIONS)?;

        let request = protocol::JoinGroupRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            group_id,
            options.session_timeout_ms,
            options.rebalance_timeout_ms,
            options.member_id.clone(),
            &options.protocol_type,
            protocols.clone(),
        )?;
        let response = self.send_request(&request).await?;
        let response = protocol::JoinGroupResponse::try_from(response)?;

        if response.error_code != KafkaCode::MemberIdRequired {
            return Ok(response);
        }

        tracing::debug!(
            "Coordinator reserved member id {:?}, rejoining",
            response.member_id
        );
        let retry = protocol::JoinGroupRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            group_id,
            options.session_timeout_ms,
            options.rebalance_timeout_ms,
            response.member_id.clone(),
            &options.protocol_type,
            protocols,
        )?;
        let response = self.send_request(&retry).await?;
        let response = protocol::JoinGroupResponse::try_from(response)?;

        if response.error_code == KafkaCode::MemberIdRequired {
            return Err(Error::MemberIdRequired {
                member_id: response.member_id,
            });
        }
        Ok(response)
    }

    /// Synchronize state for all members of a group.
    pub async fn sync_group(
        &self,
        group_id: &str,
        generation_id: i32,
        member_id: Bytes,
        assignments: Vec<protocol::sync_group::request::Assignment<'_>>,
    ) -> Result<protocol::SyncGroupResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(api_keys::SYNC_GROUP, protocol::sync_group::VERSIONS)?;

        let request = protocol::SyncGroupRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            group_id,
            generation_id,
            member_id,
            assignments,
        )?;

        let response = self.send_request(&request).await?;
        protocol::SyncGroupResponse::try_from(response)
    }

    /// Directly depart a group.
    pub async fn leave_group(
        &self,
        group_id: &str,
        member_id: Bytes,
    ) -> Result<protocol::LeaveGroupResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(api_keys::LEAVE_GROUP, protocol::leave_group::VERSIONS)?;

        let request = protocol::LeaveGroupRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            group_id,
            member_id,
        )?;

        let response = self.send_request(&request).await?;
        protocol::LeaveGroupResponse::parse(response, version)
    }

    /// Locate the coordinator broker for a group.
    pub async fn find_coordinator(
        &self,
        group_id: &str,
    ) -> Result<protocol::FindCoordinatorResponse> {
        self.ensure_connected().await?;
        let version =
            self.api_version(api_keys::FIND_COORDINATOR, protocol::find_coordinator::VERSIONS)?;

        let request = protocol::FindCoordinatorRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            group_id,
            COORDINATOR_TYPE_GROUP,
        );

        let response = self.send_request(&request).await?;
        protocol::FindCoordinatorResponse::parse(response, version)
    }

    /// Describe the state and membership of groups.
    pub async fn describe_groups(
        &self,
        group_ids: &[String],
    ) -> Result<protocol::DescribeGroupsResponse> {
        self.ensure_connected().await?;
        let version =
            self.api_version(api_keys::DESCRIBE_GROUPS, protocol::describe_groups::VERSIONS)?;

        let request = protocol::DescribeGroupsRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            group_ids,
        );

        let response = self.send_request(&request).await?;
        protocol::DescribeGroupsResponse::parse(response, version)
    }

    /// List the groups this broker coordinates.
    pub async fn list_groups(&self) -> Result<protocol::ListGroupsResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(api_keys::LIST_GROUPS, protocol::list_groups::VERSIONS)?;

        let request = protocol::ListGroupsRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
        );

        let response = self.send_request(&request).await?;
        protocol::ListGroupsResponse::parse(response, version)
    }

    /// Delete groups.
    pub async fn delete_groups(
        &self,
        group_ids: &[String],
    ) -> Result<protocol::DeleteGroupsResponse> {
        self.ensure_connected().await?;
        let version =
            self.api_version(api_keys::DELETE_GROUPS, protocol::delete_groups::VERSIONS)?;

        let request = protocol::DeleteGroupsRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            group_ids,
        );

        let response = self.send_request(&request).await?;
        protocol::DeleteGroupsResponse::try_from(response)
    }

    /// Create topics; the broker must be the controller.
    pub async fn create_topics(
        &self,
        topics: Vec<NewTopic>,
        options: CreateOptions,
    ) -> Result<protocol::CreateTopicsResponse> {
        self.ensure_connected().await?;
        let version =
            self.api_version(api_keys::CREATE_TOPICS, protocol::create_topics::VERSIONS)?;

        let mut request = protocol::CreateTopicsRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            options.timeout_ms,
            options.validate_only,
        );
        for topic in topics.iter() {
            request.add(&topic.name, topic.num_partitions, topic.replication_factor);
        }

        let response = self.send_request(&request).await?;
        protocol::CreateTopicsResponse::parse(response, version)
    }

    /// Grow the partition count of existing topics.
    pub async fn create_partitions(
        &self,
        topic_partitions: Vec<(String, i32)>,
        options: CreateOptions,
    ) -> Result<protocol::CreatePartitionsResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(
            api_keys::CREATE_PARTITIONS,
            protocol::create_partitions::VERSIONS,
        )?;

        let mut request = protocol::CreatePartitionsRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            options.timeout_ms,
            options.validate_only,
        );
        for (topic, count) in topic_partitions.iter() {
            request.add(topic, *count);
        }

        let response = self.send_request(&request).await?;
        protocol::CreatePartitionsResponse::try_from(response)
    }

    /// Delete topics.
    pub async fn delete_topics(
        &self,
        topic_names: &[String],
        timeout_ms: i32,
    ) -> Result<protocol::DeleteTopicsResponse> {
        self.ensure_connected().await?;
        let version =
            self.api_version(api_keys::DELETE_TOPICS, protocol::delete_topics::VERSIONS)?;

        let request = protocol::DeleteTopicsRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            topic_names,
            timeout_ms,
        );

        let response = self.send_request(&request).await?;
        protocol::DeleteTopicsResponse::parse(response, version)
    }

    /// Read configuration entries.
    pub async fn describe_configs(
        &self,
        resources: Vec<ConfigResource>,
        include_synonyms: bool,
    ) -> Result<protocol::DescribeConfigsResponse> {
        self.ensure_connected().await?;
        let version =
            self.api_version(api_keys::DESCRIBE_CONFIGS, protocol::describe_configs::VERSIONS)?;

        let mut request = protocol::DescribeConfigsRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            include_synonyms,
        );
        for resource in resources.iter() {
            request.add(
                resource.resource_type,
                &resource.name,
                resource.config_names.iter().map(|n| n.as_str()).collect(),
            );
        }

        let response = self.send_request(&request).await?;
        protocol::DescribeConfigsResponse::parse(response, version)
    }

    /// Alter configuration entries.
    pub async fn alter_configs(
        &self,
        resources: Vec<ConfigUpdate>,
        validate_only: bool,
    ) -> Result<protocol::AlterConfigsResponse> {
        self.ensure_connected().await?;
        let version =
            self.api_version(api_keys::ALTER_CONFIGS, protocol::alter_configs::VERSIONS)?;

        let mut request = protocol::AlterConfigsRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            validate_only,
        );
        for resource in resources.iter() {
            request.add(
                resource.resource_type,
                &resource.name,
                resource
                    .entries
                    .iter()
                    .map(|(name, value)| protocol::alter_configs::request::Config {
                        name,
                        value: value.as_deref(),
                    })
                    .collect(),
            );
        }

        let response = self.send_request(&request).await?;
        protocol::AlterConfigsResponse::try_from(response)
    }

    /// Delete records below an offset per partition.
    pub async fn delete_records(
        &self,
        topics: Vec<DeleteRecordsTopic>,
        timeout_ms: i32,
    ) -> Result<protocol::DeleteRecordsResponse> {
        self.ensure_connected().await?;
        let version =
            self.api_version(api_keys::DELETE_RECORDS, protocol::delete_records::VERSIONS)?;

        let mut request = protocol::DeleteRecordsRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            timeout_ms,
        );
        for topic in topics.iter() {
            for (partition, offset) in topic.partitions.iter() {
                request.add(&topic.topic, *partition, *offset);
            }
        }

        let response = self.send_request(&request).await?;
        protocol::DeleteRecordsResponse::try_from(response)
    }

    /// Obtain a producer id & epoch.
    pub async fn init_producer_id(
        &self,
        transactional_id: Option<&str>,
        transaction_timeout_ms: i32,
    ) -> Result<protocol::InitProducerIdResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(
            api_keys::INIT_PRODUCER_ID,
            protocol::init_producer_id::VERSIONS,
        )?;

        let request = protocol::InitProducerIdRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            transactional_id,
            transaction_timeout_ms,
        );

        let response = self.send_request(&request).await?;
        protocol::InitProducerIdResponse::try_from(response)
    }

    /// Add partitions to an ongoing transaction.
    pub async fn add_partitions_to_txn(
        &self,
        transactional_id: &str,
        producer_id: i64,
        producer_epoch: i16,
        topics: Vec<(String, Vec<i32>)>,
    ) -> Result<protocol::AddPartitionsToTxnResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(
            api_keys::ADD_PARTITIONS_TO_TXN,
            protocol::add_partitions_to_txn::VERSIONS,
        )?;

        let mut request = protocol::AddPartitionsToTxnRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            transactional_id,
            producer_id,
            producer_epoch,
        );
        for (topic, partitions) in topics.iter() {
            for partition in partitions.iter() {
                request.add(topic, *partition);
            }
        }

        let response = self.send_request(&request).await?;
        protocol::AddPartitionsToTxnResponse::try_from(response)
    }

    /// Include a group's offset commits in a transaction.
    pub async fn add_offsets_to_txn(
        &self,
        transactional_id: &str,
        producer_id: i64,
        producer_epoch: i16,
        group_id: &str,
    ) -> Result<protocol::AddOffsetsToTxnResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(
            api_keys::ADD_OFFSETS_TO_TXN,
            protocol::add_offsets_to_txn::VERSIONS,
        )?;

        let request = protocol::AddOffsetsToTxnRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            transactional_id,
            producer_id,
            producer_epoch,
            group_id,
        );

        let response = self.send_request(&request).await?;
        protocol::AddOffsetsToTxnResponse::try_from(response)
    }

    /// Commit offsets to a group within a transaction.
    #[allow(clippy::too_many_arguments)]
    pub async fn txn_offset_commit(
        &self,
        transactional_id: &str,
        group_id: &str,
        producer_id: i64,
        producer_epoch: i16,
        topics: Vec<CommitTopic>,
    ) -> Result<protocol::TxnOffsetCommitResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(
            api_keys::TXN_OFFSET_COMMIT,
            protocol::txn_offset_commit::VERSIONS,
        )?;

        let mut request = protocol::TxnOffsetCommitRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            transactional_id,
            group_id,
            producer_id,
            producer_epoch,
        );
        for topic in topics.iter() {
            for partition in topic.partitions.iter() {
                request.add(
                    &topic.topic,
                    partition.partition,
                    partition.offset,
                    partition.metadata.as_deref(),
                );
            }
        }

        let response = self.send_request(&request).await?;
        protocol::TxnOffsetCommitResponse::try_from(response)
    }

    /// Commit or abort a transaction.
    pub async fn end_txn(
        &self,
        transactional_id: &str,
        producer_id: i64,
        producer_epoch: i16,
        committed: bool,
    ) -> Result<protocol::EndTxnResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(api_keys::END_TXN, protocol::end_txn::VERSIONS)?;

        let request = protocol::EndTxnRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            transactional_id,
            producer_id,
            producer_epoch,
            committed,
        );

        let response = self.send_request(&request).await?;
        protocol::EndTxnResponse::try_from(response)
    }

    /// Create ACL bindings. The entries ride as the request's
    /// `creations` array.
    pub async fn create_acls(&self, acl: Vec<AclEntry>) -> Result<protocol::CreateAclsResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(api_keys::CREATE_ACLS, protocol::create_acls::VERSIONS)?;

        let request = protocol::CreateAclsRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            acl,
        );

        let response = self.send_request(&request).await?;
        protocol::CreateAclsResponse::try_from(response)
    }

    /// List the ACLs matching a filter.
    pub async fn describe_acls(
        &self,
        filter: AclFilter,
    ) -> Result<protocol::DescribeAclsResponse> {
        self.ensure_connected().await?;
        let version =
            self.api_version(api_keys::DESCRIBE_ACLS, protocol::describe_acls::VERSIONS)?;

        let request = protocol::DescribeAclsRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            filter,
        );

        let response = self.send_request(&request).await?;
        protocol::DescribeAclsResponse::parse(response, version)
    }

    /// Delete the ACLs matching a set of filters.
    pub async fn delete_acls(
        &self,
        filters: Vec<AclFilter>,
    ) -> Result<protocol::DeleteAclsResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(api_keys::DELETE_ACLS, protocol::delete_acls::VERSIONS)?;

        let request = protocol::DeleteAclsRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            filters,
        );

        let response = self.send_request(&request).await?;
        protocol::DeleteAclsResponse::parse(response, version)
    }

    /// Probe the broker's supported API versions.
    ///
    /// `connect()` runs this automatically; it is exposed for callers
    /// that want a fresh table without the rest of the bring-up.
    pub async fn api_versions(&self) -> Result<RequestLookup> {
        if !self.connection.connected() {
            self.connection.connect().await?;
        }
        versions::negotiate(&self.connection, self.next_correlation_id(), &self.client_id).await
    }

    /// Advertise a SASL mechanism to the broker.
    pub async fn sasl_handshake(
        &self,
        mechanism: String,
    ) -> Result<protocol::SaslHandshakeResponse> {
        self.ensure_connected().await?;
        let version =
            self.api_version(api_keys::SASL_HANDSHAKE, protocol::sasl_handshake::VERSIONS)?;

        sasl::sasl_handshake(
            &self.connection,
            version,
            self.next_correlation_id(),
            &self.client_id,
            mechanism,
        )
        .await
    }

    /// Carry one opaque mechanism token in a `SaslAuthenticate` frame.
    pub async fn sasl_authenticate(
        &self,
        auth_bytes: Bytes,
    ) -> Result<protocol::SaslAuthenticateResponse> {
        self.ensure_connected().await?;
        let version = self.api_version(
            api_keys::SASL_AUTHENTICATE,
            protocol::sasl_authenticate::VERSIONS,
        )?;

        let request = protocol::SaslAuthenticateRequest::new(
            version,
            self.next_correlation_id(),
            &self.client_id,
            auth_bytes,
        );

        let response = self.send_request(&request).await?;
        protocol::SaslAuthenticateResponse::parse(response, version)
    }
}

/// Flatten, shuffle, and re-group a fetch topic list (KIP-74).
///
/// Consecutive pairs sharing a topic collapse back into one entry so the
/// request stays compact without undoing the shuffle.
fn interleave_topics(topics: Vec<FetchTopic>) -> Vec<FetchTopic> {
    let mut flattened: Vec<(String, FetchPartition)> = Vec::new();
    for topic in topics {
        for partition in topic.partitions {
            flattened.push((topic.topic.clone(), partition));
        }
    }

    flattened.shuffle(&mut thread_rng());

    let mut regrouped: Vec<FetchTopic> = Vec::new();
    for (topic, partition) in flattened {
        match regrouped.last_mut() {
            Some(last) if last.topic == topic => last.partitions.push(partition),
            _ => regrouped.push(FetchTopic {
                topic,
                partitions: vec![partition],
            }),
        }
    }
    regrouped
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    fn fetch_topic(topic: &str, partitions: &[i32]) -> FetchTopic {
        FetchTopic {
            topic: topic.to_string(),
            partitions: partitions
                .iter()
                .map(|p| FetchPartition {
                    partition: *p,
                    ..FetchPartition::default()
                })
                .collect(),
        }
    }

    fn pair_set(topics: &[FetchTopic]) -> HashSet<(String, i32)> {
        topics
            .iter()
            .flat_map(|t| {
                t.partitions
                    .iter()
                    .map(|p| (t.topic.clone(), p.partition))
            })
            .collect()
    }

    #[test]
    fn interleave_is_a_permutation() {
        let input = vec![
            fetch_topic("a", &[0, 1, 2, 3]),
            fetch_topic("b", &[0, 1]),
            fetch_topic("c", &[7]),
        ];
        let expected = pair_set(&input);

        for _ in 0..100 {
            let output = interleave_topics(input.clone());
            assert_eq!(pair_set(&output), expected);
            let count: usize = output.iter().map(|t| t.partitions.len()).sum();
            assert_eq!(count, 7);
        }
    }

    #[test]
    fn interleave_consolidates_adjacent_topics() {
        let input = vec![fetch_topic("a", &[0, 1, 2]), fetch_topic("b", &[0, 1, 2])];

        for _ in 0..100 {
            let output = interleave_topics(input.clone());
            for window in output.windows(2) {
                assert_ne!(window[0].topic, window[1].topic);
            }
        }
    }

    #[test]
    fn interleave_single_topic_collapses_to_one_entry() {
        let input = vec![fetch_topic("t", &[0, 1])];

        for _ in 0..20 {
            let output = interleave_topics(input.clone());
            assert_eq!(output.len(), 1);
            assert_eq!(output[0].topic, "t");
            assert_eq!(output[0].partitions.len(), 2);
        }
    }

    #[test]
    fn reauthentication_flips_once_at_the_threshold() {
        let session_lifetime_ms = 60000;
        let threshold_ms = 10000;

        assert!(!should_reauthenticate(
            session_lifetime_ms,
            threshold_ms,
            Some(0)
        ));
        assert!(!should_reauthenticate(
            session_lifetime_ms,
            threshold_ms,
            Some(40000)
        ));
        assert!(!should_reauthenticate(
            session_lifetime_ms,
            threshold_ms,
            Some(49999)
        ));
        assert!(should_reauthenticate(
            session_lifetime_ms,
            threshold_ms,
            Some(50000)
        ));
        assert!(should_reauthenticate(
            session_lifetime_ms,
            threshold_ms,
            Some(55000)
        ));
        assert!(should_reauthenticate(
            session_lifetime_ms,
            threshold_ms,
            Some(60001)
        ));

        // exactly one flip over the whole range
        let flips = (0..70000)
            .map(|elapsed| should_reauthenticate(session_lifetime_ms, threshold_ms, Some(elapsed)))
            .collect::<Vec<_>>()
            .windows(2)
            .filter(|w| w[0] != w[1])
            .count();
        assert_eq!(flips, 1);
    }

    #[test]
    fn zero_session_lifetime_disables_reauthentication() {
        assert!(!should_reauthenticate(0, 10000, Some(i64::MAX / 2)));
        assert!(!should_reauthenticate(0, 10000, None));
    }

    #[test]
    fn missing_session_requires_authentication() {
        assert!(should_reauthenticate(60000, 10000, None));
    }
}
