use alloc::{vec, vec::Vec};

use uawire_codec_builtin::{ByteString, GUID_LEN, Guid, UaString};

use crate::error::{NodeIdEncodeError, NodeIdParseError};

/// 编码掩码 bit 7：ExpandedNodeId 携带 NamespaceUri。
const URI_FLAG: u8 = 0b1000_0000;
/// 编码掩码 bit 6：ExpandedNodeId 携带 ServerIndex。
const INDEX_FLAG: u8 = 0b0100_0000;
/// 掩码中属于扩展标志的位。
const FLAG_MASK: u8 = URI_FLAG | INDEX_FLAG;
/// 掩码中属于形态选择的位。
const SHAPE_MASK: u8 = !FLAG_MASK;

const SHAPE_TWO_BYTE: u8 = 0x00;
const SHAPE_FOUR_BYTE: u8 = 0x01;
const SHAPE_NUMERIC: u8 = 0x02;
const SHAPE_STRING: u8 = 0x03;
const SHAPE_GUID: u8 = 0x04;
const SHAPE_OPAQUE: u8 = 0x05;

/// 基础标识符的六种线上形态（Part 6 §5.2.2.9）。
///
/// 形态决定掩码字节之后的布局与总长度；TwoByte/FourByte 是线上占比最高的两种，
/// 为其保留紧凑布局正是该编码存在多形态的动机。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// `u8` 数值标识，命名空间固定为 0，总长 2 字节。
    TwoByte(u8),
    /// `u8` 命名空间 + `u16` 数值标识，总长 4 字节。
    FourByte {
        /// 命名空间索引（0-255）。
        namespace: u8,
        /// 数值标识。
        id: u16,
    },
    /// `u16` 命名空间 + `u32` 数值标识，总长 7 字节。
    Numeric {
        /// 命名空间索引。
        namespace: u16,
        /// 数值标识。
        id: u32,
    },
    /// `u16` 命名空间 + 长度前缀字符串标识。
    String {
        /// 命名空间索引。
        namespace: u16,
        /// 文本标识负载。
        value: UaString,
    },
    /// `u16` 命名空间 + 16 字节 GUID 标识，总长 19 字节。
    Guid {
        /// 命名空间索引。
        namespace: u16,
        /// GUID 标识负载。
        value: Guid,
    },
    /// `u16` 命名空间 + 长度前缀不透明字节标识。
    Opaque {
        /// 命名空间索引。
        namespace: u16,
        /// 不透明标识负载。
        value: ByteString,
    },
}

impl Identifier {
    /// 返回该形态在掩码低位中的取值。
    const fn shape_bits(&self) -> u8 {
        match self {
            Self::TwoByte(_) => SHAPE_TWO_BYTE,
            Self::FourByte { .. } => SHAPE_FOUR_BYTE,
            Self::Numeric { .. } => SHAPE_NUMERIC,
            Self::String { .. } => SHAPE_STRING,
            Self::Guid { .. } => SHAPE_GUID,
            Self::Opaque { .. } => SHAPE_OPAQUE,
        }
    }

    /// 返回承载的命名空间索引（TwoByte 形态固定为 0）。
    fn namespace(&self) -> u16 {
        match self {
            Self::TwoByte(_) => 0,
            Self::FourByte { namespace, .. } => u16::from(*namespace),
            Self::Numeric { namespace, .. }
            | Self::String { namespace, .. }
            | Self::Guid { namespace, .. }
            | Self::Opaque { namespace, .. } => *namespace,
        }
    }
}

/// 基础节点标识符：掩码字节 + 形态负载。
///
/// # 设计动机（Why）
/// - 掩码字节的低位选择形态，高两位是 [`ExpandedNodeId`](crate::ExpandedNodeId)
///   可选字段的存在标志。标志物理上住在本类型里，因此本类型暴露
///   `has_uri_flag` / `set_uri_flag`（及 index 对应物）这组显式访问器，
///   扩展形态只读写这组访问器，绝不另存一份布尔状态。
///
/// # 契约说明（What）
/// - 形态位始终由 [`Identifier`] 推导，`flags` 字段仅保留高两位；
///   `encoding_mask` 返回两者按位合成的线上字节。
/// - 解码保留输入掩码中的标志位原值，编码原样写回，保证扩展形态 round-trip。
///
/// # 权衡与风险（Trade-offs）
/// - 数值形态不做取值范围归一（例如数值很小也不会自动降级为 TwoByte），
///   编码形态由构造方显式选择，与参考实现一致。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeId {
    flags: u8,
    identifier: Identifier,
}

impl Default for NodeId {
    fn default() -> Self {
        Self::two_byte(0)
    }
}

impl NodeId {
    /// 构造 TwoByte 数值标识符（命名空间固定 0）。
    #[must_use]
    pub const fn two_byte(id: u8) -> Self {
        Self {
            flags: 0,
            identifier: Identifier::TwoByte(id),
        }
    }

    /// 构造 FourByte 数值标识符。
    #[must_use]
    pub const fn four_byte(namespace: u8, id: u16) -> Self {
        Self {
            flags: 0,
            identifier: Identifier::FourByte { namespace, id },
        }
    }

    /// 构造 Numeric 数值标识符。
    #[must_use]
    pub const fn numeric(namespace: u16, id: u32) -> Self {
        Self {
            flags: 0,
            identifier: Identifier::Numeric { namespace, id },
        }
    }

    /// 构造 String 文本标识符。
    pub fn string(namespace: u16, value: &str) -> Self {
        Self {
            flags: 0,
            identifier: Identifier::String {
                namespace,
                value: UaString::new(value),
            },
        }
    }

    /// 构造 Guid 标识符。
    #[must_use]
    pub const fn guid(namespace: u16, value: Guid) -> Self {
        Self {
            flags: 0,
            identifier: Identifier::Guid { namespace, value },
        }
    }

    /// 构造 Opaque 不透明标识符。
    pub fn opaque(namespace: u16, value: impl Into<Vec<u8>>) -> Self {
        Self {
            flags: 0,
            identifier: Identifier::Opaque {
                namespace,
                value: ByteString::new(value),
            },
        }
    }

    /// 返回形态负载。
    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// 返回命名空间索引（TwoByte 形态固定为 0）。
    #[must_use]
    pub fn namespace(&self) -> u16 {
        self.identifier.namespace()
    }

    /// 返回线上编码掩码字节：形态位与扩展标志位的合成。
    #[must_use]
    pub fn encoding_mask(&self) -> u8 {
        self.identifier.shape_bits() | self.flags
    }

    /// 查询 NamespaceUri 存在标志（掩码 bit 7）。
    #[must_use]
    pub const fn has_uri_flag(&self) -> bool {
        self.flags & URI_FLAG != 0
    }

    /// 查询 ServerIndex 存在标志（掩码 bit 6）。
    #[must_use]
    pub const fn has_index_flag(&self) -> bool {
        self.flags & INDEX_FLAG != 0
    }

    /// 置位 NamespaceUri 存在标志。
    pub fn set_uri_flag(&mut self) {
        self.flags |= URI_FLAG;
    }

    /// 置位 ServerIndex 存在标志。
    pub fn set_index_flag(&mut self) {
        self.flags |= INDEX_FLAG;
    }

    /// 返回该值当前的线上占用字节数（掩码字节计入）。
    #[must_use]
    pub fn occupied_len(&self) -> usize {
        match &self.identifier {
            Identifier::TwoByte(_) => 2,
            Identifier::FourByte { .. } => 4,
            Identifier::Numeric { .. } => 7,
            Identifier::String { value, .. } => 3 + value.occupied_len(),
            Identifier::Guid { .. } => 3 + GUID_LEN,
            Identifier::Opaque { value, .. } => 3 + value.occupied_len(),
        }
    }

    /// 自缓冲起始位置解码一个基础标识符。
    pub fn decode(b: &[u8]) -> Result<Self, NodeIdParseError> {
        let mut node = Self::default();
        node.decode_from_bytes(b)?;
        Ok(node)
    }

    /// 自缓冲起始位置解码，成功后覆盖 `self`。
    ///
    /// - **分派依据**：首字节低位形态值；未定义取值返回
    ///   [`NodeIdParseError::UnknownShape`]；
    /// - **标志保留**：首字节高两位原样存入，供扩展形态查询；
    /// - **失败语义**：任何错误返回前 `self` 均保持原状。
    pub fn decode_from_bytes(&mut self, b: &[u8]) -> Result<(), NodeIdParseError> {
        let Some(mask) = b.first().copied() else {
            return Err(NodeIdParseError::BufferTooShort);
        };
        let shape = mask & SHAPE_MASK;
        let identifier = match shape {
            SHAPE_TWO_BYTE => {
                if b.len() < 2 {
                    return Err(NodeIdParseError::BufferTooShort);
                }
                Identifier::TwoByte(b[1])
            }
            SHAPE_FOUR_BYTE => {
                if b.len() < 4 {
                    return Err(NodeIdParseError::BufferTooShort);
                }
                Identifier::FourByte {
                    namespace: b[1],
                    id: u16::from_le_bytes([b[2], b[3]]),
                }
            }
            SHAPE_NUMERIC => {
                if b.len() < 7 {
                    return Err(NodeIdParseError::BufferTooShort);
                }
                Identifier::Numeric {
                    namespace: u16::from_le_bytes([b[1], b[2]]),
                    id: u32::from_le_bytes([b[3], b[4], b[5], b[6]]),
                }
            }
            SHAPE_STRING => {
                if b.len() < 3 {
                    return Err(NodeIdParseError::BufferTooShort);
                }
                let mut value = UaString::null();
                value.decode_from_bytes(&b[3..])?;
                Identifier::String {
                    namespace: u16::from_le_bytes([b[1], b[2]]),
                    value,
                }
            }
            SHAPE_GUID => {
                if b.len() < 3 {
                    return Err(NodeIdParseError::BufferTooShort);
                }
                let mut value = Guid::default();
                value.decode_from_bytes(&b[3..])?;
                Identifier::Guid {
                    namespace: u16::from_le_bytes([b[1], b[2]]),
                    value,
                }
            }
            SHAPE_OPAQUE => {
                if b.len() < 3 {
                    return Err(NodeIdParseError::BufferTooShort);
                }
                let mut value = ByteString::null();
                value.decode_from_bytes(&b[3..])?;
                Identifier::Opaque {
                    namespace: u16::from_le_bytes([b[1], b[2]]),
                    value,
                }
            }
            other => return Err(NodeIdParseError::UnknownShape(other)),
        };

        self.flags = mask & FLAG_MASK;
        self.identifier = identifier;
        Ok(())
    }

    /// 将该值编码到缓冲起始位置，返回写入的字节数。
    ///
    /// - **失败语义**：缓冲不足时返回 [`NodeIdEncodeError::BufferTooSmall`]，
    ///   检查先于任何写入。
    pub fn encode_into(&self, dst: &mut [u8]) -> Result<usize, NodeIdEncodeError> {
        let required = self.occupied_len();
        if dst.len() < required {
            return Err(NodeIdEncodeError::BufferTooSmall);
        }
        dst[0] = self.encoding_mask();
        match &self.identifier {
            Identifier::TwoByte(id) => {
                dst[1] = *id;
            }
            Identifier::FourByte { namespace, id } => {
                dst[1] = *namespace;
                dst[2..4].copy_from_slice(&id.to_le_bytes());
            }
            Identifier::Numeric { namespace, id } => {
                dst[1..3].copy_from_slice(&namespace.to_le_bytes());
                dst[3..7].copy_from_slice(&id.to_le_bytes());
            }
            Identifier::String { namespace, value } => {
                dst[1..3].copy_from_slice(&namespace.to_le_bytes());
                value.encode_into(&mut dst[3..])?;
            }
            Identifier::Guid { namespace, value } => {
                dst[1..3].copy_from_slice(&namespace.to_le_bytes());
                value.encode_into(&mut dst[3..])?;
            }
            Identifier::Opaque { namespace, value } => {
                dst[1..3].copy_from_slice(&namespace.to_le_bytes());
                value.encode_into(&mut dst[3..])?;
            }
        }
        Ok(required)
    }

    /// 便捷编码：分配恰好 `occupied_len` 字节并写入。
    pub fn encode(&self) -> Result<Vec<u8>, NodeIdEncodeError> {
        let mut buf = vec![0u8; self.occupied_len()];
        self.encode_into(&mut buf)?;
        Ok(buf)
    }
}
