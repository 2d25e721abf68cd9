use core::fmt;

use crate::error::{BuiltinEncodeError, BuiltinParseError};

/// GUID 的固定线上长度（单位：字节）。
pub const GUID_LEN: usize = 16;

/// OPC UA GUID（Part 6 §5.2.2.7）：`u32`/`u16`/`u16` 小端字段加 8 个原始字节。
///
/// NodeId 的 Guid 形态以该类型承载标识负载；混合字节序布局与微软 GUID 约定一致，
/// 因此不能将 16 字节整体按大端或小端处理。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Guid {
    data1: u32,
    data2: u16,
    data3: u16,
    data4: [u8; 8],
}

impl Guid {
    /// 以四个字段构造 GUID。
    #[must_use]
    pub const fn new(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self {
            data1,
            data2,
            data3,
            data4,
        }
    }

    /// 返回固定占用长度（始终为 [`GUID_LEN`]）。
    #[must_use]
    pub const fn occupied_len(&self) -> usize {
        GUID_LEN
    }

    /// 自缓冲起始位置解码 16 字节 GUID，成功后覆盖 `self`。
    pub fn decode_from_bytes(&mut self, b: &[u8]) -> Result<(), BuiltinParseError> {
        if b.len() < GUID_LEN {
            return Err(BuiltinParseError::BufferTooShort);
        }
        self.data1 = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        self.data2 = u16::from_le_bytes([b[4], b[5]]);
        self.data3 = u16::from_le_bytes([b[6], b[7]]);
        self.data4.copy_from_slice(&b[8..16]);
        Ok(())
    }

    /// 将 GUID 编码到缓冲起始位置，返回写入的字节数。
    pub fn encode_into(&self, dst: &mut [u8]) -> Result<usize, BuiltinEncodeError> {
        if dst.len() < GUID_LEN {
            return Err(BuiltinEncodeError::BufferTooSmall);
        }
        dst[0..4].copy_from_slice(&self.data1.to_le_bytes());
        dst[4..6].copy_from_slice(&self.data2.to_le_bytes());
        dst[6..8].copy_from_slice(&self.data3.to_le_bytes());
        dst[8..16].copy_from_slice(&self.data4);
        Ok(GUID_LEN)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08X}-{:04X}-{:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}",
            self.data1,
            self.data2,
            self.data3,
            self.data4[0],
            self.data4[1],
            self.data4[2],
            self.data4[3],
            self.data4[4],
            self.data4[5],
            self.data4[6],
            self.data4[7],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn round_trip_uses_mixed_endian_layout() {
        let guid = Guid::new(
            0x72962B91,
            0xFA75,
            0x4AE6,
            [0x8D, 0x28, 0xB4, 0x04, 0xDC, 0x7D, 0xAF, 0x63],
        );
        let mut buf = [0u8; GUID_LEN];
        assert_eq!(guid.encode_into(&mut buf).expect("应可编码"), GUID_LEN);
        // 前三个字段为小端，尾部 8 字节按原样排列。
        assert_eq!(&buf[..8], &[0x91, 0x2B, 0x96, 0x72, 0x75, 0xFA, 0xE6, 0x4A]);

        let mut decoded = Guid::default();
        decoded.decode_from_bytes(&buf).expect("应可解码");
        assert_eq!(decoded, guid);
    }

    #[test]
    fn short_buffers_are_rejected_both_ways() {
        let mut decoded = Guid::default();
        assert_eq!(
            decoded.decode_from_bytes(&[0u8; 15]).unwrap_err(),
            BuiltinParseError::BufferTooShort
        );

        let guid = Guid::new(1, 2, 3, [0; 8]);
        let mut dst = [0u8; 15];
        assert_eq!(
            guid.encode_into(&mut dst).unwrap_err(),
            BuiltinEncodeError::BufferTooSmall
        );
    }

    #[test]
    fn display_matches_canonical_form() {
        let guid = Guid::new(
            0x72962B91,
            0xFA75,
            0x4AE6,
            [0x8D, 0x28, 0xB4, 0x04, 0xDC, 0x7D, 0xAF, 0x63],
        );
        assert_eq!(
            guid.to_string(),
            "72962B91-FA75-4AE6-8D28-B404DC7DAF63"
        );
    }
}
