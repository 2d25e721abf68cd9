use alloc::{
    string::{String, ToString},
    vec,
    vec::Vec,
};
use core::str;

use crate::error::{BuiltinEncodeError, BuiltinParseError};

/// `i32` 小端长度前缀所占的字节数。
pub const LENGTH_PREFIX_LEN: usize = 4;

/// 长度前缀中表示 null 的哨兵值。
const NULL_LENGTH: i32 = -1;

/// OPC UA 长度前缀字符串（Part 6 §5.2.2.4）。
///
/// # 设计动机（Why）
/// - NodeId 的 String 形态与 ExpandedNodeId 的 NamespaceUri 字段共用同一套文本编码，
///   抽取为独立类型可让上层以黑盒方式消费（解码、编码、占用长度三个入口）。
/// - 协议区分「null 字符串」与「空字符串」：前者前缀为 `-1`，后者前缀为 `0`，
///   因此内部以 `Option<String>` 建模而非裸 `String`。
///
/// # 契约说明（What）
/// - **前置条件**：编码前调用方须按 [`occupied_len`](Self::occupied_len) 预留缓冲；
/// - **后置条件**：解码成功后该值与线上字节一一对应，重编码产生相同字节序列。
///
/// # 权衡与风险（Trade-offs）
/// - 解码执行 UTF-8 校验并拷贝负载，换取 Rust 字符串类型安全；
///   原始字节语义请使用 [`ByteString`]。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UaString {
    value: Option<String>,
}

impl UaString {
    /// 以给定文本构造非 null 字符串（空文本合法，编码为长度 0）。
    pub fn new(value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
        }
    }

    /// 构造 null 字符串（长度前缀 `-1`）。
    #[must_use]
    pub const fn null() -> Self {
        Self { value: None }
    }

    /// 判断是否为 null 字符串。
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// 返回文本内容；null 字符串返回 `None`。
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// 返回该值当前的线上占用字节数（前缀 + 负载）。
    #[must_use]
    pub fn occupied_len(&self) -> usize {
        LENGTH_PREFIX_LEN + self.value.as_ref().map_or(0, |text| text.len())
    }

    /// 自缓冲起始位置解码一个长度前缀字符串，成功后覆盖 `self`。
    ///
    /// - **失败语义**：任何错误返回前 `self` 均保持原状；
    /// - **边界**：前缀 `-1` 解码为 null，其余负值返回 [`BuiltinParseError::LengthOutOfRange`]。
    pub fn decode_from_bytes(&mut self, b: &[u8]) -> Result<(), BuiltinParseError> {
        let payload = decode_length_prefixed(b)?;
        match payload {
            None => self.value = None,
            Some(bytes) => {
                let text = str::from_utf8(bytes).map_err(|_| BuiltinParseError::InvalidUtf8)?;
                self.value = Some(text.to_string());
            }
        }
        Ok(())
    }

    /// 将该值编码到缓冲起始位置，返回写入的字节数。
    ///
    /// - **失败语义**：缓冲不足或长度溢出时不写入任何字节。
    pub fn encode_into(&self, dst: &mut [u8]) -> Result<usize, BuiltinEncodeError> {
        encode_length_prefixed(self.value.as_ref().map(String::as_bytes), dst)
    }

    /// 便捷编码：分配恰好 `occupied_len` 字节并写入。
    pub fn encode(&self) -> Result<Vec<u8>, BuiltinEncodeError> {
        let mut buf = vec![0u8; self.occupied_len()];
        self.encode_into(&mut buf)?;
        Ok(buf)
    }
}

/// OPC UA 长度前缀字节串，布局与 [`UaString`] 相同但不做 UTF-8 约束。
///
/// NodeId 的 Opaque 形态以该类型承载不透明标识负载。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteString {
    value: Option<Vec<u8>>,
}

impl ByteString {
    /// 以给定字节构造非 null 字节串。
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    /// 构造 null 字节串。
    #[must_use]
    pub const fn null() -> Self {
        Self { value: None }
    }

    /// 判断是否为 null 字节串。
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// 返回负载字节；null 字节串返回 `None`。
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    /// 返回该值当前的线上占用字节数（前缀 + 负载）。
    #[must_use]
    pub fn occupied_len(&self) -> usize {
        LENGTH_PREFIX_LEN + self.value.as_ref().map_or(0, Vec::len)
    }

    /// 自缓冲起始位置解码一个长度前缀字节串，成功后覆盖 `self`。
    pub fn decode_from_bytes(&mut self, b: &[u8]) -> Result<(), BuiltinParseError> {
        let payload = decode_length_prefixed(b)?;
        self.value = payload.map(<[u8]>::to_vec);
        Ok(())
    }

    /// 将该值编码到缓冲起始位置，返回写入的字节数。
    pub fn encode_into(&self, dst: &mut [u8]) -> Result<usize, BuiltinEncodeError> {
        encode_length_prefixed(self.value.as_deref(), dst)
    }
}

/// 读取长度前缀并切出负载区间；`None` 表示 null。
fn decode_length_prefixed(b: &[u8]) -> Result<Option<&[u8]>, BuiltinParseError> {
    if b.len() < LENGTH_PREFIX_LEN {
        return Err(BuiltinParseError::BufferTooShort);
    }
    let declared = i32::from_le_bytes([b[0], b[1], b[2], b[3]]);
    if declared == NULL_LENGTH {
        return Ok(None);
    }
    if declared < 0 {
        return Err(BuiltinParseError::LengthOutOfRange(declared));
    }
    let len = declared as usize;
    let end = LENGTH_PREFIX_LEN
        .checked_add(len)
        .ok_or(BuiltinParseError::BufferTooShort)?;
    if b.len() < end {
        return Err(BuiltinParseError::BufferTooShort);
    }
    Ok(Some(&b[LENGTH_PREFIX_LEN..end]))
}

/// 写入长度前缀与负载；所有检查先于任何写入。
fn encode_length_prefixed(
    payload: Option<&[u8]>,
    dst: &mut [u8],
) -> Result<usize, BuiltinEncodeError> {
    let Some(bytes) = payload else {
        if dst.len() < LENGTH_PREFIX_LEN {
            return Err(BuiltinEncodeError::BufferTooSmall);
        }
        dst[..LENGTH_PREFIX_LEN].copy_from_slice(&NULL_LENGTH.to_le_bytes());
        return Ok(LENGTH_PREFIX_LEN);
    };

    if bytes.len() > i32::MAX as usize {
        return Err(BuiltinEncodeError::LengthOverflow(bytes.len()));
    }
    let required = LENGTH_PREFIX_LEN + bytes.len();
    if dst.len() < required {
        return Err(BuiltinEncodeError::BufferTooSmall);
    }
    dst[..LENGTH_PREFIX_LEN].copy_from_slice(&(bytes.len() as i32).to_le_bytes());
    dst[LENGTH_PREFIX_LEN..required].copy_from_slice(bytes);
    Ok(required)
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn string_round_trip(text in "\\PC{0,64}") {
            let value = UaString::new(&text);
            let encoded = value.encode().expect("合法文本应可编码");
            prop_assert_eq!(encoded.len(), value.occupied_len());

            let mut decoded = UaString::null();
            decoded.decode_from_bytes(&encoded).expect("自编码字节应可解码");
            prop_assert_eq!(decoded, value);
        }

        #[test]
        fn byte_string_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let value = ByteString::new(bytes);
            let mut buf = vec![0u8; value.occupied_len()];
            let written = value.encode_into(&mut buf).expect("应可编码");
            prop_assert_eq!(written, value.occupied_len());

            let mut decoded = ByteString::null();
            decoded.decode_from_bytes(&buf).expect("应可解码");
            prop_assert_eq!(decoded, value);
        }
    }
}
