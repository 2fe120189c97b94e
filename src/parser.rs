//! Deserialize data from the bytecode protocol.
use bytes::Bytes;
use nom::{
    bytes::complete::take,
    combinator::map,
    error::{ErrorKind, ParseError},
    multi::many_m_n,
    number::complete::{be_i16, be_i32, be_i8, be_u16, be_u32},
    Err::*,
    IResult,
    Needed::Unknown,
};
use nombytes::NomBytes;
use num_traits::FromPrimitive;

use crate::error::KafkaCode;

pub fn parse_kafka_code(s: NomBytes) -> IResult<NomBytes, KafkaCode> {
    map(be_i16, |n| {
        FromPrimitive::from_i16(n).unwrap_or(KafkaCode::Unknown)
    })(s)
}

pub fn parse_boolean(s: NomBytes) -> IResult<NomBytes, bool> {
    map(be_i8, |b| b != 0)(s)
}

pub fn take_varint<E>(i: NomBytes) -> nom::IResult<NomBytes, usize, E>
where
    E: ParseError<NomBytes>,
{
    let mut res: usize = 0;
    let mut count: usize = 0;
    let mut remainder = i;
    loop {
        let byte = match take::<usize, NomBytes, ()>(1)(remainder) {
            Ok((rest, bytes)) => {
                remainder = rest;
                let bytes = bytes.to_bytes();
                bytes.first().cloned().unwrap()
            }
            Err(_) => return Err(Incomplete(Unknown)),
        };
        res += ((byte as usize) & 127)
            .checked_shl((count * 7).try_into().unwrap_or(u32::MAX))
            .ok_or_else(|| Error(E::from_error_kind(remainder.clone(), ErrorKind::MapOpt)))?;
        count += 1;
        if (byte >> 7) == 0 {
            return Ok((remainder, res));
        }
    }
}

/// The zigzag-encoded signed varint used inside record batches.
pub fn take_zigzag_varint<E>(i: NomBytes) -> nom::IResult<NomBytes, i64, E>
where
    E: ParseError<NomBytes>,
{
    let (rest, raw) = take_varint::<E>(i)?;
    let raw = raw as u64;
    Ok((rest, ((raw >> 1) as i64) ^ -((raw & 1) as i64)))
}

pub fn parse_string(s: NomBytes) -> IResult<NomBytes, Bytes> {
    let (s, length) = be_u16(s)?;
    let (s, string) = take(length)(s)?;
    Ok((s, string.into_bytes()))
}

pub fn parse_bytes(s: NomBytes) -> IResult<NomBytes, Bytes> {
    let (s, length) = be_u32(s)?;
    let (s, string) = take(length)(s)?;
    Ok((s, string.into_bytes()))
}

pub fn parse_array<O, E, F>(f: F) -> impl FnMut(NomBytes) -> IResult<NomBytes, Vec<O>, E>
where
    F: nom::Parser<NomBytes, O, E> + Copy,
    E: nom::error::ParseError<NomBytes>,
{
    move |input: NomBytes| {
        let i = input.clone();
        let (i, length) = be_i32(i)?;
        if length == -1 {
            return Ok((i, vec![]));
        }
        many_m_n(length as usize, length as usize, f)(i)
    }
}

/// A flexible-version COMPACT_ARRAY: unsigned varint of length + 1.
pub fn parse_compact_array<O, E, F>(f: F) -> impl FnMut(NomBytes) -> IResult<NomBytes, Vec<O>, E>
where
    F: nom::Parser<NomBytes, O, E> + Copy,
    E: nom::error::ParseError<NomBytes>,
{
    move |input: NomBytes| {
        let (i, length) = take_varint(input)?;
        if length == 0 {
            return Ok((i, vec![]));
        }
        many_m_n(length - 1, length - 1, f)(i)
    }
}

pub fn parse_compact_string(s: NomBytes) -> IResult<NomBytes, Bytes> {
    let (s, length) = take_varint(s)?;
    if length == 0 {
        return Ok((s, Bytes::new()));
    }
    let (s, string) = take(length - 1)(s)?;
    Ok((s, string.into_bytes()))
}

/// Skips a flexible-version tagged-field section.
pub fn parse_tagged_fields(s: NomBytes) -> IResult<NomBytes, ()> {
    let (mut s, count) = take_varint(s)?;
    for _ in 0..count {
        let (rest, _tag) = take_varint(s)?;
        let (rest, size) = take_varint(rest)?;
        let (rest, _data) = take(size)(rest)?;
        s = rest;
    }
    Ok((s, ()))
}

pub fn parse_nullable_string(s: NomBytes) -> IResult<NomBytes, Option<Bytes>> {
    let (s, length) = be_i16(s)?;
    if length == -1 {
        return Ok((s, None));
    }

    let (s, string) = take(length as u16)(s)?;
    Ok((s, Some(string.into_bytes())))
}

pub fn parse_nullable_bytes(s: NomBytes) -> IResult<NomBytes, Option<Bytes>> {
    let (s, length) = be_i32(s)?;
    if length == -1 {
        return Ok((s, None));
    }

    let (s, bytes) = take(length as u32)(s)?;
    Ok((s, Some(bytes.into_bytes())))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_varint_simple() {
        assert_eq!(
            take_varint::<()>(NomBytes::from(b"\x0b\x01\x02\x03" as &[u8])),
            Ok((NomBytes::from(b"\x01\x02\x03" as &[u8]), 11))
        );
    }

    #[test]
    fn parse_varint_twobyte() {
        assert_eq!(
            take_varint::<()>(NomBytes::from(b"\x84\x02\x04\x05\x06" as &[u8])),
            Ok((NomBytes::from(b"\x04\x05\x06" as &[u8]), 260))
        );
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn parse_varlong() {
        assert_eq!(
            take_varint::<()>(NomBytes::from(
                b"\xff\xff\xff\xff\xff\xff\xff\xff\x7f\x04\x05\x06" as &[u8]
            )),
            Ok((
                NomBytes::from(b"\x04\x05\x06" as &[u8]),
                9223372036854775807
            ))
        );
    }

    #[test]
    fn parse_zigzag() {
        assert_eq!(
            take_zigzag_varint::<()>(NomBytes::from(b"\x01" as &[u8])),
            Ok((NomBytes::from(b"" as &[u8]), -1))
        );
        assert_eq!(
            take_zigzag_varint::<()>(NomBytes::from(b"\x84\x02" as &[u8])),
            Ok((NomBytes::from(b"" as &[u8]), 130))
        );
    }

    #[test]
    fn test_parse_string() {
        let buf = NomBytes::from(b"\x00\x04\x72\x75\x73\x74" as &[u8]);

        assert_eq!(
            parse_string(buf).unwrap().1,
            NomBytes::from(b"\x72\x75\x73\x74" as &[u8]).to_bytes()
        );
    }

    #[test]
    fn test_parse_compact_string() {
        let buf = NomBytes::from(b"\x05\x72\x75\x73\x74" as &[u8]);

        assert_eq!(
            parse_compact_string(buf).unwrap().1,
            Bytes::from_static(b"rust")
        );

        // empty marker
        let buf = NomBytes::from(b"\x00" as &[u8]);
        assert_eq!(parse_compact_string(buf).unwrap().1, Bytes::new());
    }

    #[test]
    fn test_parse_array() {
        let buf = NomBytes::from(
            [
                0, 0, 0, 2, // array size
                0, 4, 114, 117, 115, 116, // string
                0, 4, 114, 117, 115, 116, // string
                0, 0, 0, // leftover input
            ]
            .as_slice(),
        );

        assert_eq!(
            parse_array(parse_string)(buf).unwrap().1,
            vec![Bytes::from_static(b"rust"), Bytes::from_static(b"rust")]
        );
    }

    #[test]
    fn test_parse_null_array() {
        let buf = NomBytes::from([255, 255, 255, 255].as_slice());

        assert_eq!(
            parse_array(parse_string)(buf).unwrap().1,
            Vec::<Bytes>::new()
        );
    }

    #[test]
    fn test_parse_tagged_fields() {
        // one tagged field: tag 0, size 2, two payload bytes, then leftover
        let buf = NomBytes::from([1, 0, 2, 9, 9, 7].as_slice());
        let (rest, ()) = parse_tagged_fields(buf).unwrap();
        assert_eq!(rest.to_bytes(), Bytes::from_static(&[7]));
    }
}
