//! Parsing and processing for Fetch responses.

use bytes::Bytes;
use nom::{
    bytes::complete::take,
    multi::many0,
    number::complete::{be_i16, be_i32, be_i64, be_i8},
    IResult,
};
use nombytes::NomBytes;

use crate::{
    error::{Error, KafkaCode, Result},
    parser,
    protocol::{parse_header_response, produce::request::{Attributes, Compression}, HeaderResponse},
    utils::uncompress,
};

/*
Fetch Response (Version: 4) => throttle_time_ms [responses]
  throttle_time_ms => INT32
  responses => topic [partitions]
    topic => STRING
    partitions => partition_index error_code high_watermark last_stable_offset [aborted_transactions] records
      partition_index => INT32
      error_code => INT16
      high_watermark => INT64
      last_stable_offset => INT64
      aborted_transactions => producer_id first_offset
        producer_id => INT64
        first_offset => INT64
      records => RECORD BATCH

Fetch Response (Version: 11) => throttle_time_ms error_code session_id [responses]
  responses => topic [partitions]
    partitions => partition_index error_code high_watermark last_stable_offset log_start_offset [aborted_transactions] preferred_read_replica records

RECORD BATCH
    baseOffset: int64
    batchLength: int32
    partitionLeaderEpoch: int32
    magic: int8 (current magic value is 2)
    crc: int32
    attributes: int16
        bit 0~2:
            0: no compression
            1: gzip
            2: snappy
            3: lz4
            4: zstd
        bit 3: timestampType
        bit 4: isTransactional (0 means not transactional)
        bit 5: isControlBatch (0 means not a control batch)
        bit 7~15: unused
    lastOffsetDelta: int32
    baseTimestamp: int64
    maxTimestamp: int64
    producerId: int64
    producerEpoch: int16
    baseSequence: int32
    records: [Record]

Record
    length: varint
    attributes: int8
    timestampDelta: varlong
    offsetDelta: varint
    keyLength: varint
    key: byte[]
    valueLen: varint
    value: byte[]
    Headers => [Header]
*/

// bytes of batch header between batchLength and the record count,
// inclusive of the count itself
const BATCH_HEADER_AFTER_LENGTH: i32 = 49;

#[derive(Debug, Default, PartialEq)]
pub struct FetchResponse {
    pub header_response: HeaderResponse,
    /// The duration in milliseconds for which the request was throttled due to a quota violation, or zero if the request did not violate any quota.
    pub throttle_time_ms: i32,
    /// The top level response error code. Version 7+.
    pub error_code: KafkaCode,
    /// The fetch session ID, or 0 if this is not part of a fetch session. Version 7+.
    pub session_id: i32,
    /// The response topics.
    pub topics: Vec<Topic>,
}

impl FetchResponse {
    pub fn parse(s: Bytes, api_version: i16) -> Result<Self> {
        tracing::trace!("Parsing FetchResponse {:?}", s);
        let (_, fetch_response) = parse_fetch_response(NomBytes::new(s.clone()), api_version)
            .map_err(|err| {
                tracing::error!("ERROR: Failed parsing FetchResponse {:?}", err);
                tracing::error!("ERROR: FetchResponse Bytes {:?}", s);
                Error::ParsingError(s)
            })?;
        tracing::trace!("Parsed FetchResponse {:?}", fetch_response);
        Ok(fetch_response)
    }

    pub fn record_count(&self) -> usize {
        self.topics.iter().map(|batch| batch.record_count()).sum()
    }
}

/// The response topics.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    pub name: Bytes,
    pub partitions: Vec<Partition>,
}

impl Topic {
    pub fn record_count(&self) -> usize {
        self.partitions.iter().map(|batch| batch.record_count()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub id: i32,
    pub error_code: KafkaCode,
    pub high_water_mark: i64,
    pub last_stable_offset: i64,
    /// The current log start offset. Version 5+.
    pub log_start_offset: i64,
    pub aborted_transactions: Vec<AbortedTransactions>,
    /// The preferred read replica for the consumer to use on its next
    /// fetch request, or -1 (KIP-392). Version 11+.
    pub preferred_read_replica: i32,
    pub record_batch: Vec<RecordBatch>,
}

impl Partition {
    pub fn into_box_iter(self) -> Box<impl Iterator<Item = (i32, KafkaCode, i64, i64, Record)>> {
        Box::new(self.record_batch.into_iter().flat_map(move |batch| {
            batch.records.into_iter().map(move |record| {
                (
                    self.id,
                    self.error_code,
                    batch.base_offset,
                    batch.base_timestamp,
                    record,
                )
            })
        }))
    }

    pub fn record_count(&self) -> usize {
        self.record_batch.iter().map(|batch| batch.record_count()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AbortedTransactions {
    pub producer_id: i64,
    pub first_offset: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordBatch {
    pub base_offset: i64,
    pub batch_length: i32,
    pub partition_leader_epoch: i32,
    pub magic: i8,
    pub crc: i32,
    pub attributes: Attributes,
    pub last_offset_delta: i32,
    pub base_timestamp: i64,
    pub max_timestamp: i64,
    pub producer_id: i64,
    pub producer_epoch: i16,
    pub base_sequence: i32,
    pub records: Vec<Record>,
}

impl RecordBatch {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub attributes: i8,
    pub timestamp_delta: i64,
    pub offset_delta: i64,
    pub key: Option<Bytes>,
    pub value: Option<Bytes>,
    pub headers: Vec<Header>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub header_key: Bytes,
    pub value: Option<Bytes>,
}

pub fn parse_fetch_response(s: NomBytes, api_version: i16) -> IResult<NomBytes, FetchResponse> {
    let (s, header_response) = parse_header_response(s)?;
    let (s, throttle_time_ms) = be_i32(s)?;
    let (s, error_code, session_id) = if api_version >= 7 {
        let (s, error_code) = parser::parse_kafka_code(s)?;
        let (s, session_id) = be_i32(s)?;
        (s, error_code, session_id)
    } else {
        (s, KafkaCode::None, 0)
    };
    let (s, topics) = parser::parse_array(move |t| parse_topic(t, api_version))(s)?;

    Ok((
        s,
        FetchResponse {
            header_response,
            throttle_time_ms,
            error_code,
            session_id,
            topics,
        },
    ))
}

fn parse_topic(s: NomBytes, api_version: i16) -> IResult<NomBytes, Topic> {
    let (s, name) = parser::parse_string(s)?;
    let (s, partitions) = parser::parse_array(move |p| parse_partition(p, api_version))(s)?;

    Ok((s, Topic { name, partitions }))
}

fn parse_partition(s: NomBytes, api_version: i16) -> IResult<NomBytes, Partition> {
    let (s, id) = be_i32(s)?;
    let (s, error_code) = parser::parse_kafka_code(s)?;
    let (s, high_water_mark) = be_i64(s)?;
    let (s, last_stable_offset) = be_i64(s)?;
    let (s, log_start_offset) = if api_version >= 5 { be_i64(s)? } else { (s, -1) };
    let (s, aborted_transactions) = parser::parse_array(parse_aborted_transactions)(s)?;
    let (s, preferred_read_replica) = if api_version >= 11 { be_i32(s)? } else { (s, -1) };

    // the record set is size delimited; batches beyond it belong to the
    // next partition. -1 marks a null record set.
    let (s, record_set_size) = be_i32(s)?;
    let (s, record_batch) = if record_set_size <= 0 {
        (s, vec![])
    } else {
        let (s, record_set) = take(record_set_size as usize)(s)?;
        let (_, record_batch) = many0(parse_record_batch)(record_set)?;
        (s, record_batch)
    };

    Ok((
        s,
        Partition {
            id,
            error_code,
            high_water_mark,
            last_stable_offset,
            log_start_offset,
            aborted_transactions,
            preferred_read_replica,
            record_batch,
        },
    ))
}

fn parse_aborted_transactions(s: NomBytes) -> IResult<NomBytes, AbortedTransactions> {
    let (s, producer_id) = be_i64(s)?;
    let (s, first_offset) = be_i64(s)?;

    Ok((
        s,
        AbortedTransactions {
            producer_id,
            first_offset,
        },
    ))
}

pub fn parse_record_batch(s: NomBytes) -> IResult<NomBytes, RecordBatch> {
    let (s, base_offset) = be_i64(s)?;
    let (s, batch_length) = be_i32(s)?;
    let (s, partition_leader_epoch) = be_i32(s)?;
    let (s, magic) = be_i8(s)?;
    let (s, crc) = be_i32(s)?;
    let (s, attributes) = be_i16(s)?;
    let attributes = Attributes::from(attributes);
    let (s, last_offset_delta) = be_i32(s)?;
    let (s, base_timestamp) = be_i64(s)?;
    let (s, max_timestamp) = be_i64(s)?;
    let (s, producer_id) = be_i64(s)?;
    let (s, producer_epoch) = be_i16(s)?;
    let (s, base_sequence) = be_i32(s)?;
    let (s, record_count) = be_i32(s)?;
    let record_count = record_count as usize;

    // When compression is enabled, the RecordBatch header remains
    // uncompressed, but the Records are compressed together
    let (s, records) = match attributes.compression {
        Some(Compression::Gzip) => {
            tracing::debug!("Decompressing with GZIP");
            let (s, compressed_records) =
                take((batch_length - BATCH_HEADER_AFTER_LENGTH) as usize)(s)?;
            let records_bytes =
                uncompress(compressed_records.into_bytes().as_ref()).map_err(|_| {
                    nom::Err::Failure(nom::error::Error::new(
                        s.clone(),
                        nom::error::ErrorKind::MapRes,
                    ))
                })?;
            let (_, records) = nom::multi::many_m_n(record_count, record_count, parse_record)(
                NomBytes::new(Bytes::from(records_bytes)),
            )?;

            (s, records)
        }
        _ => nom::multi::many_m_n(record_count, record_count, parse_record)(s)?,
    };

    Ok((
        s,
        RecordBatch {
            base_offset,
            batch_length,
            partition_leader_epoch,
            magic,
            crc,
            attributes,
            last_offset_delta,
            base_timestamp,
            max_timestamp,
            producer_id,
            producer_epoch,
            base_sequence,
            records,
        },
    ))
}

fn parse_record(s: NomBytes) -> IResult<NomBytes, Record> {
    let (s, _length) = parser::take_zigzag_varint(s)?;
    let (s, attributes) = be_i8(s)?;
    let (s, timestamp_delta) = parser::take_zigzag_varint(s)?;
    let (s, offset_delta) = parser::take_zigzag_varint(s)?;
    let (s, key) = parse_record_payload(s)?;
    let (s, value) = parse_record_payload(s)?;

    let (mut s, header_count) = parser::take_zigzag_varint(s)?;
    let mut headers = Vec::with_capacity(header_count.max(0) as usize);
    for _ in 0..header_count {
        let (rest, header) = parse_header(s)?;
        headers.push(header);
        s = rest;
    }

    Ok((
        s,
        Record {
            attributes,
            timestamp_delta,
            offset_delta,
            key,
            value,
            headers,
        },
    ))
}

// a zigzag length of -1 is a null payload
fn parse_record_payload(s: NomBytes) -> IResult<NomBytes, Option<Bytes>> {
    let (s, length) = parser::take_zigzag_varint(s)?;
    if length < 0 {
        return Ok((s, None));
    }
    let (s, payload) = take(length as usize)(s)?;
    Ok((s, Some(payload.into_bytes())))
}

fn parse_header(s: NomBytes) -> IResult<NomBytes, Header> {
    let (s, key_length) = parser::take_zigzag_varint(s)?;
    let (s, header_key) = take(key_length.max(0) as usize)(s)?;
    let (s, value) = parse_record_payload(s)?;

    Ok((
        s,
        Header {
            header_key: header_key.into_bytes(),
            value,
        },
    ))
}
