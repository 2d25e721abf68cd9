use core::fmt;

/// 内建标量类型的解码错误枚举，明确调用方可预期的失败场景。
///
/// - **Why**：上层标识符编码需要区分「字节不足」与「内容非法」，以便将子编解码失败原样上抛；
/// - **How**：解码过程中一旦检测到违反 Part 6 布局的情况即返回对应枚举值，且不写入目标值的任何字段；
/// - **Contract**：所有错误均为可复制枚举，便于在 `no_std` 环境中使用。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinParseError {
    /// 剩余字节不足以覆盖长度前缀或其声明的负载。
    BufferTooShort,
    /// 长度前缀为 `-1`（null）以外的负值。
    LengthOutOfRange(i32),
    /// 字符串负载不是合法 UTF-8。
    InvalidUtf8,
}

impl fmt::Display for BuiltinParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooShort => f.write_str("输入缓冲不足以覆盖声明的负载"),
            Self::LengthOutOfRange(len) => {
                write!(f, "长度前缀取值非法：{}（仅允许 -1 表示 null）", len)
            }
            Self::InvalidUtf8 => f.write_str("字符串负载不是合法 UTF-8"),
        }
    }
}

/// 内建标量类型的编码错误枚举。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinEncodeError {
    /// 输出缓冲不足以容纳完整编码，未写入任何字节。
    BufferTooSmall,
    /// 负载长度超出 `i32` 前缀的可表达范围。
    LengthOverflow(usize),
}

impl fmt::Display for BuiltinEncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall => f.write_str("输出缓冲区不足"),
            Self::LengthOverflow(len) => {
                write!(f, "负载长度 {} 超出 i32 长度前缀的表达范围", len)
            }
        }
    }
}
