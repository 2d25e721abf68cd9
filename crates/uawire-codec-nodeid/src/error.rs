use core::fmt;

use uawire_codec_builtin::{BuiltinEncodeError, BuiltinParseError};

/// 标识符解码错误枚举，区分「字节不足」「形态未知」与「子编解码失败」。
///
/// - **Why**：调用方需要判断失败是输入截断还是内容损坏，以决定等待更多字节还是丢弃报文；
/// - **How**：子编解码（长度前缀字符串等）的失败原样上抛，不做本地恢复或默认替换；
/// - **Contract**：任何错误返回时目标值均未被修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeIdParseError {
    /// 剩余字节不足以覆盖掩码声明的布局（含服务器索引的显式边界检查）。
    BufferTooShort,
    /// 编码掩码低位不是已定义的六种形态之一。
    UnknownShape(u8),
    /// 字符串 / 字节串 / GUID 子编解码失败，原样携带底层错误。
    MalformedField(BuiltinParseError),
}

impl fmt::Display for NodeIdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooShort => f.write_str("输入缓冲不足以覆盖掩码声明的布局"),
            Self::UnknownShape(shape) => {
                write!(f, "编码掩码形态位非法：{:#04x}（仅定义 0x00..=0x05）", shape)
            }
            Self::MalformedField(err) => write!(f, "标识符子字段损坏：{}", err),
        }
    }
}

impl From<BuiltinParseError> for NodeIdParseError {
    fn from(err: BuiltinParseError) -> Self {
        match err {
            // 子字段的截断与整体截断对调用方语义一致，合流为同一错误。
            BuiltinParseError::BufferTooShort => Self::BufferTooShort,
            other => Self::MalformedField(other),
        }
    }
}

/// 标识符编码错误枚举。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeIdEncodeError {
    /// 输出缓冲不足以容纳完整编码，未写入任何字节。
    BufferTooSmall,
    /// 子字段编码失败（如负载长度超出 i32 前缀范围）。
    MalformedField(BuiltinEncodeError),
}

impl fmt::Display for NodeIdEncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall => f.write_str("输出缓冲区不足"),
            Self::MalformedField(err) => write!(f, "标识符子字段无法编码：{}", err),
        }
    }
}

impl From<BuiltinEncodeError> for NodeIdEncodeError {
    fn from(err: BuiltinEncodeError) -> Self {
        match err {
            BuiltinEncodeError::BufferTooSmall => Self::BufferTooSmall,
            other => Self::MalformedField(other),
        }
    }
}
