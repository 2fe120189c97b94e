use std::io::{Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use crc::Crc;
use flate2::{read::GzDecoder, write::GzEncoder, Compression as GzLevel};

use crate::error::{Error, Result};

pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as i64
}

// record batches carry a CRC-32C over everything after the crc field
pub fn to_crc(data: &[u8]) -> u32 {
    Crc::<u32>::new(&crc::CRC_32_ISCSI).checksum(data)
}

pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), GzLevel::default());
    encoder
        .write_all(data)
        .map_err(|e| Error::IoError(e.kind()))?;
    encoder.finish().map_err(|e| Error::IoError(e.kind()))
}

pub fn uncompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| Error::IoError(e.kind()))?;
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gzip_roundtrip() {
        let data = b"a message worth compressing, repeated and repeated and repeated";
        let compressed = compress(data).unwrap();
        assert_eq!(uncompress(&compressed).unwrap(), data.to_vec());
    }
}
