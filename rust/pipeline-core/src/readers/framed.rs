// rust/pipeline-core/src/readers/framed.rs

//! Length-prefixed, checksummed frames.
//!
//! Frame layout, all integers little-endian:
//! ```text
//! +----------------------+
//! | length       (u64)   |
//! | masked crc32c(length)|  <- u32
//! | payload  (length B)  |
//! | masked crc32c(data)  |  <- u32
//! +----------------------+
//! ```

use std::path::Path;

use bytes::Bytes;

use super::RecordReader;
use crate::error::{PipelineError, Result};
use crate::io::ByteSource;

/// Size of the length field plus its checksum.
pub const FRAME_HEADER_LEN: usize = 12;
const FRAME_FOOTER_LEN: usize = 4;
const MASK_DELTA: u32 = 0xa282_ead8;

/// CRC-32C of `data` with the rotate-and-add mask applied.
pub fn masked_crc32c(data: &[u8]) -> u32 {
    let crc = crc32c::crc32c(data);
    crc.rotate_right(15).wrapping_add(MASK_DELTA)
}

/// Inverse of the mask applied by [`masked_crc32c`].
pub fn unmask_crc(masked: u32) -> u32 {
    masked.wrapping_sub(MASK_DELTA).rotate_left(15)
}

/// Reads frames, validating both checksums of each.
///
/// Zero bytes left before a length field is a clean end of file. Any other
/// shortfall, or a checksum mismatch, is `DataLoss`.
pub struct FramedRecordReader {
    source: ByteSource,
}

impl FramedRecordReader {
    pub fn new(source: ByteSource) -> Self {
        Self { source }
    }

    fn corrupt(&self, offset: u64, message: impl std::fmt::Display) -> PipelineError {
        tracing::warn!(
            "Corrupt frame in {} at offset {}: {}",
            self.source.path().display(),
            offset,
            message
        );
        PipelineError::data_loss(
            self.source.path(),
            format!("{message} (frame at offset {offset})"),
        )
    }
}

impl RecordReader for FramedRecordReader {
    fn read_record(&mut self) -> Result<Option<Bytes>> {
        let offset = self.source.position();

        let mut header = [0u8; FRAME_HEADER_LEN];
        let n = self.source.read_full(&mut header)?;
        if n == 0 {
            return Ok(None);
        }
        if n < FRAME_HEADER_LEN {
            return Err(self.corrupt(
                offset,
                format!("truncated frame header: {n} of {FRAME_HEADER_LEN} bytes"),
            ));
        }

        let mut raw_length = [0u8; 8];
        let mut raw_length_crc = [0u8; 4];
        raw_length.copy_from_slice(&header[..8]);
        raw_length_crc.copy_from_slice(&header[8..]);
        if masked_crc32c(&raw_length) != u32::from_le_bytes(raw_length_crc) {
            return Err(self.corrupt(offset, "corrupted frame length"));
        }
        let length = u64::from_le_bytes(raw_length);

        let payload = self.source.read_up_to(length)?;
        if (payload.len() as u64) < length {
            return Err(self.corrupt(
                offset,
                format!("truncated frame payload: {} of {length} bytes", payload.len()),
            ));
        }

        let mut footer = [0u8; FRAME_FOOTER_LEN];
        let n = self.source.read_full(&mut footer)?;
        if n < FRAME_FOOTER_LEN {
            return Err(self.corrupt(offset, "truncated frame checksum"));
        }
        if masked_crc32c(&payload) != u32::from_le_bytes(footer) {
            return Err(self.corrupt(offset, "corrupted frame payload"));
        }

        Ok(Some(Bytes::from(payload)))
    }

    fn path(&self) -> &Path {
        self.source.path()
    }

    fn name(&self) -> &'static str {
        "framed"
    }
}
