//! Encoding and creation for Produce requests.

use bytes::{BufMut, Bytes};

use crate::{
    encode::{ToByte, VarInt},
    error::Result,
    protocol::{api_keys, HeaderRequest},
    utils::{compress, now, to_crc},
};

/// The magic byte (a.k.a version) we use for sent messages.
const MESSAGE_MAGIC_BYTE: i8 = 2;

/*
Produce Request (Version: 3) => transactional_id acks timeout [topic_data]
  transactional_id => NULLABLE_STRING
  acks => INT16
  timeout => INT32
  topic_data => topic [data]
    topic => STRING
    data => partition record_set
      partition => INT32
      record_set => RECORDS
*/

/// Codec applied to the records section of each batch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Compression {
    #[default]
    None,
    Gzip,
}

/// The record batch attributes bitfield.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Attributes {
    /// bits 0~2 of the bitfield; `None` when the batch is uncompressed.
    pub compression: Option<Compression>,
}

impl Attributes {
    pub fn new(compression: Option<Compression>) -> Self {
        Self { compression }
    }

    fn to_i16(self) -> i16 {
        match self.compression {
            None | Some(Compression::None) => 0,
            Some(Compression::Gzip) => 1,
        }
    }
}

impl From<i16> for Attributes {
    fn from(bits: i16) -> Self {
        match bits & 0b111 {
            1 => Attributes::new(Some(Compression::Gzip)),
            _ => Attributes::new(None),
        }
    }
}

#[derive(Debug)]
pub struct ProduceRequest<'a> {
    pub header: HeaderRequest<'a>,
    /// The transactional ID of the producer. This is used to authorize transaction produce requests. This can be null for non-transactional producers.
    pub transactional_id: Option<String>,
    /// The number of acknowledgments the producer requires the leader to have received before considering a request complete. Allowed values: 0 for no acknowledgments, 1 for only the leader and -1 for the full ISR.
    pub required_acks: i16,
    /// The timeout to await a response in milliseconds.
    pub timeout_ms: i32,
    /// Codec for every record batch in this request.
    pub compression: Compression,
    /// The producer id from `InitProducerId`, or -1 for an idempotence-free producer.
    pub producer_id: i64,
    /// The current epoch of the producer id.
    pub producer_epoch: i16,
    /// Each topic to produce to.
    topic_partitions: Vec<TopicPartition<'a>>,
}

impl<'a> ProduceRequest<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        api_version: i16,
        correlation_id: i32,
        client_id: &'a str,
        required_acks: i16,
        timeout_ms: i32,
        compression: Compression,
        transactional_id: Option<String>,
        producer_id: i64,
        producer_epoch: i16,
    ) -> ProduceRequest<'a> {
        ProduceRequest {
            header: HeaderRequest::new(api_keys::PRODUCE, api_version, correlation_id, client_id),
            transactional_id,
            required_acks,
            timeout_ms,
            compression,
            producer_id,
            producer_epoch,
            topic_partitions: vec![],
        }
    }

    pub fn add(&mut self, topic: &'a str, partition: i32, message: Message) {
        let compression = self.compression;
        let producer_id = self.producer_id;
        let producer_epoch = self.producer_epoch;
        match self
            .topic_partitions
            .iter_mut()
            .find(|tp| tp.index == topic)
        {
            Some(tp) => {
                tp.add(partition, message, compression, producer_id, producer_epoch);
            }
            None => {
                let mut tp = TopicPartition::new(topic);
                tp.add(partition, message, compression, producer_id, producer_epoch);
                self.topic_partitions.push(tp);
            }
        }
    }
}

impl<'a> ToByte for ProduceRequest<'a> {
    fn encode<W: BufMut>(&self, buffer: &mut W) -> Result<()> {
        tracing::trace!("Encoding ProduceRequest {:?}", self);
        self.header.encode(buffer)?;
        self.transactional_id.encode(buffer)?;
        self.required_acks.encode(buffer)?;
        self.timeout_ms.encode(buffer)?;
        self.topic_partitions.encode(buffer)?;
        Ok(())
    }
}

#[derive(Debug)]
struct TopicPartition<'a> {
    /// The topic name.
    pub index: &'a str,
    /// Each partition to produce to.
    pub partitions: Vec<Partition>,
}

impl<'a> TopicPartition<'a> {
    pub fn new(index: &'a str) -> TopicPartition {
        TopicPartition {
            index,
            partitions: vec![],
        }
    }

    pub fn add(
        &mut self,
        partition: i32,
        message: Message,
        compression: Compression,
        producer_id: i64,
        producer_epoch: i16,
    ) {
        match self
            .partitions
            .iter_mut()
            .find(|p| p.partition == partition)
        {
            Some(p) => {
                p.add(message);
            }
            None => {
                let mut p = Partition::new(partition, compression, producer_id, producer_epoch);
                p.add(message);
                self.partitions.push(p);
            }
        }
    }
}

impl<'a> ToByte for TopicPartition<'a> {
    fn encode<W: BufMut>(&self, buffer: &mut W) -> Result<()> {
        tracing::trace!("Encoding TopicPartition {:?}", self);
        self.index.encode(buffer)?;
        self.partitions.encode(buffer)?;
        Ok(())
    }
}

#[derive(Debug)]
struct Partition {
    /// The partition index.
    pub partition: i32,
    /// The record data to be produced.
    pub batches: Vec<RecordBatch>,
    compression: Compression,
    producer_id: i64,
    producer_epoch: i16,
}

impl Partition {
    pub fn new(
        partition: i32,
        compression: Compression,
        producer_id: i64,
        producer_epoch: i16,
    ) -> Partition {
        Partition {
            partition,
            batches: Vec::new(),
            compression,
            producer_id,
            producer_epoch,
        }
    }

    // all records for a partition go into one batch
    pub fn add(&mut self, message: Message) {
        if self.batches.is_empty() {
            self.batches.push(RecordBatch::new(
                self.compression,
                self.producer_id,
                self.producer_epoch,
            ));
        }

        self.batches[0].add(message);
    }
}

impl ToByte for Partition {
    fn encode<W: BufMut>(&self, out: &mut W) -> Result<()> {
        tracing::trace!("Encoding Partition {:?}", self);
        self.partition.encode(out)?;

        // encode the record batches as a bytestring not array
        let mut buf = Vec::with_capacity(4);
        for msg in &self.batches {
            msg.encode_to_buf(&mut buf)?;
        }

        buf.encode(out)
    }
}

#[derive(Clone, Debug)]
pub struct Message {
    pub key: Option<Bytes>,
    pub value: Option<Bytes>,
    pub headers: Vec<Header>,
}

impl Message {
    pub fn new(key: Option<Bytes>, value: Option<Bytes>, headers: Vec<Header>) -> Message {
        Message {
            key,
            value,
            headers,
        }
    }
}

// baseOffset: int64
// batchLength: int32
// partitionLeaderEpoch: int32
// magic: int8 (current magic value is 2)
// crc: uint32
// attributes: int16
//     bit 0~2:
//         0: no compression
//         1: gzip
//         2: snappy
//         3: lz4
//         4: zstd
//     bit 3: timestampType
//     bit 4: isTransactional (0 means not transactional)
//     bit 5: isControlBatch (0 means not a control batch)
//     bit 7~15: unused
// lastOffsetDelta: int32
// baseTimestamp: int64
// maxTimestamp: int64
// producerId: int64
// producerEpoch: int16
// baseSequence: int32
// records: [Record]
#[derive(Debug)]
struct RecordBatch {
    /// Denotes the first offset in the RecordBatch. The 'offsetDelta' of each Record in the batch would be be computed relative to this FirstOffset.
    base_offset: i64,
    /// Introduced with KIP-101, this is set by the broker upon receipt of a produce request.
    partition_leader_epoch: i32,
    /// This is a version id used to allow backwards compatible evolution of the message binary format.
    magic: i8,
    attributes: Attributes,
    /// The offset of the last message in the RecordBatch.
    last_offset_delta: i32,
    /// The timestamp of the first Record in the batch.
    base_timestamp: i64,
    /// The timestamp of the last Record in the batch.
    max_timestamp: i64,
    /// Introduced in 0.11.0.0 for KIP-98, this is the broker assigned producerId received by the 'InitProducerId' request.
    producer_id: i64,
    /// The broker assigned producerEpoch received by the 'InitProducerId' request.
    producer_epoch: i16,
    /// The producer assigned sequence number which is used by the broker to deduplicate messages.
    base_sequence: i32,
    records: Vec<Record>,
}

impl RecordBatch {
    pub fn new(compression: Compression, producer_id: i64, producer_epoch: i16) -> Self {
        Self {
            base_offset: 0,
            partition_leader_epoch: -1,
            magic: MESSAGE_MAGIC_BYTE,
            attributes: Attributes::new(match compression {
                Compression::None => None,
                other => Some(other),
            }),
            last_offset_delta: -1,
            base_timestamp: now(),
            max_timestamp: 0,
            producer_id,
            producer_epoch,
            base_sequence: -1,
            records: Vec::new(),
        }
    }

    pub fn add(&mut self, message: Message) {
        // update the state of the batch
        self.last_offset_delta += 1;
        self.max_timestamp = now();

        // calculate our deltas
        let timestamp_delta = self.max_timestamp - self.base_timestamp;
        let offset_delta = self.last_offset_delta;

        let record = Record::new(message, timestamp_delta, offset_delta as i64);
        self.records.push(record);
    }

    pub fn encode_to_buf(&self, out: &mut Vec<u8>) -> Result<()> {
        self.base_offset.encode(out)?;

        // delaying record length calculation

        let mut buf = Vec::with_capacity(4);
        self.partition_leader_epoch.encode(&mut buf)?;
        self.magic.encode(&mut buf)?;

        // will replace crc once we can calculate it
        let crc_pos = 5;
        0u32.encode(&mut buf)?;

        self.attributes.to_i16().encode(&mut buf)?;
        self.last_offset_delta.encode(&mut buf)?;
        self.base_timestamp.encode(&mut buf)?;
        self.max_timestamp.encode(&mut buf)?;
        self.producer_id.encode(&mut buf)?;
        self.producer_epoch.encode(&mut buf)?;
        self.base_sequence.encode(&mut buf)?;

        (self.records.len() as i32).encode(&mut buf)?;
        match self.attributes.compression {
            None | Some(Compression::None) => {
                for record in &self.records {
                    record.encode(&mut buf)?;
                }
            }
            Some(Compression::Gzip) => {
                let mut records = Vec::new();
                for record in &self.records {
                    record.encode(&mut records)?;
                }
                let compressed = compress(&records)?;
                buf.extend_from_slice(&compressed);
            }
        }

        let crc = to_crc(&buf[(crc_pos + 4)..]);
        crc.encode(&mut &mut buf[crc_pos..crc_pos + 4])?;

        // encode the batch as bytes with the length in front
        buf.encode(out)?;

        Ok(())
    }
}

// length: varint
// attributes: int8
// timestampDelta: varlong
// offsetDelta: varint
// keyLength: varint
// key: byte[]
// valueLen: varint
// value: byte[]
// Headers => [Header]
#[derive(Debug)]
struct Record {
    attributes: i8,
    timestamp_delta: i64,
    offset_delta: i64,
    key: Option<Bytes>,
    value: Option<Bytes>,
    headers: Vec<Header>,
}

impl Record {
    pub fn new(message: Message, timestamp_delta: i64, offset_delta: i64) -> Self {
        Self {
            attributes: 0,
            timestamp_delta,
            offset_delta,
            key: message.key,
            value: message.value,
            headers: message.headers,
        }
    }

    fn encode_to_buf(&self, out: &mut Vec<u8>) -> Result<()> {
        self.attributes.encode(out)?;
        VarInt(self.timestamp_delta).encode(out)?;
        VarInt(self.offset_delta).encode(out)?;

        // key and value are a zigzag varint length followed by bytes,
        // with -1 marking null
        encode_payload(&self.key, out)?;
        encode_payload(&self.value, out)?;

        VarInt(self.headers.len() as i64).encode(out)?;
        for header in &self.headers {
            header.encode(out)?;
        }

        Ok(())
    }
}

fn encode_payload<W: BufMut>(payload: &Option<Bytes>, out: &mut W) -> Result<()> {
    match payload {
        Some(bytes) => {
            VarInt(bytes.len() as i64).encode(out)?;
            out.put(bytes.as_ref());
        }
        None => VarInt(-1).encode(out)?,
    }
    Ok(())
}

impl ToByte for Record {
    fn encode<W: BufMut>(&self, out: &mut W) -> Result<()> {
        let mut buf = Vec::with_capacity(4);
        self.encode_to_buf(&mut buf)?;

        // the record is a zigzag varint length followed by bytes
        VarInt(buf.len() as i64).encode(out)?;
        out.put(buf.as_ref());

        Ok(())
    }
}

// headerKeyLength: varint
// headerKey: String
// headerValueLength: varint
// Value: byte[]
#[derive(Clone, Debug)]
pub struct Header {
    pub key: String,
    pub value: Option<Bytes>,
}

impl Header {
    pub fn new(key: String, value: Bytes) -> Self {
        Self {
            key,
            value: Some(value),
        }
    }
}

impl ToByte for Header {
    fn encode<W: BufMut>(&self, out: &mut W) -> Result<()> {
        VarInt(self.key.len() as i64).encode(out)?;
        out.put(self.key.as_bytes());
        encode_payload(&self.value, out)?;
        Ok(())
    }
}
