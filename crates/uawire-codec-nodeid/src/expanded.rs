use alloc::{vec, vec::Vec};

use uawire_codec_builtin::UaString;

use crate::{
    error::{NodeIdEncodeError, NodeIdParseError},
    node_id::NodeId,
};

/// ServerIndex 字段的固定线上长度。
const SERVER_INDEX_LEN: usize = 4;

/// 可选字段解码的最小剩余字节门槛，低于该值一律视为无可选字段。
const OPTIONAL_FIELDS_MIN_LEN: usize = 2;

/// 跨服务器边界的扩展节点标识符（Part 6 §5.2.2.10）。
///
/// # 设计动机（Why）
/// - ExpandedNodeId 在基础 [`NodeId`] 之上追加可选的 NamespaceUri（取代其
///   命名空间索引）与可选的 ServerIndex（指明标识符相对哪台远端服务器）；
/// - 两个可选字段的存在标志物理上存储在基础标识符的编码掩码字节高两位中，
///   本类型不另存布尔状态，每次查询都从掩码现算，消除同步失效的可能。
///
/// # 契约说明（What）
/// - `node_id` 缺席是合法的空值状态：占用长度报告 0、标志查询返回 `false`、
///   编码产出空字节序列，均不报错；
/// - 字段对外公开（与报文头结构体同一惯例），但构造请走 [`new`](Self::new) /
///   [`two_byte`](Self::two_byte) / [`four_byte`](Self::four_byte)，
///   它们负责让掩码标志与字段取值保持一致；手工拼装字段而不置位掩码的值
///   无法正确 round-trip；
/// - 若 URI 标志置位而 `namespace_uri` 为 `None`，编码按 null 字符串处理
///   （4 字节 `-1` 前缀），保证产出的字节流仍可被对端解析。
///
/// # 实现策略（How）
/// - 解码顺序固定为「基础标识符 → 可选 URI → 可选 ServerIndex」，
///   因为后两者的存在与否由第一步读出的掩码位决定；
/// - 基础标识符之后剩余字节不足 2 时，可选字段一律按缺席处理并成功返回——
///   这是参考线上行为而非严格的标志一致性检查，歧义已在下文注明；
/// - ServerIndex 读取前显式检查剩余 4 字节，不足返回
///   [`NodeIdParseError::BufferTooShort`]（修正参考实现的越界读取）。
///
/// # 风险提示（Trade-offs）
/// - 「剩余 1 字节视为无可选字段」意味着掩码声明 URI 但发送方未填字节的
///   畸形报文会被静默接受；本实现的编码器永不产出这类字节流。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedNodeId {
    /// 基础标识符；`None` 表示空值状态。
    pub node_id: Option<NodeId>,
    /// 可选命名空间 URI；仅当掩码 bit 7 置位时参与编码。
    pub namespace_uri: Option<UaString>,
    /// 可选服务器索引；仅当掩码 bit 6 置位时参与编码，否则值无线上意义。
    pub server_index: u32,
}

impl ExpandedNodeId {
    /// 以既有基础标识符构造扩展标识符。
    ///
    /// - `has_uri` 为真时在 `node_id` 掩码上置位 URI 标志并存入 `uri` 文本
    ///   （空文本同样合法——存在性由标志决定，而非文本长度）；
    /// - `has_index` 为真时置位 Index 标志并存入 `server_index`；
    /// - 基础标识符按值移入返回值。参考实现（Go）就地改写调用方保留的指针，
    ///   Rust 值语义下标志改写对外部别名不可见，语义差异已在 DESIGN.md 记录。
    #[must_use]
    pub fn new(
        has_uri: bool,
        has_index: bool,
        mut node_id: NodeId,
        uri: &str,
        server_index: u32,
    ) -> Self {
        let mut namespace_uri = None;
        if has_uri {
            node_id.set_uri_flag();
            namespace_uri = Some(UaString::new(uri));
        }
        if has_index {
            node_id.set_index_flag();
        }
        Self {
            node_id: Some(node_id),
            namespace_uri,
            server_index,
        }
    }

    /// 构造包裹 TwoByte 数值标识符的扩展标识符，无 URI 与 ServerIndex。
    #[must_use]
    pub fn two_byte(id: u8) -> Self {
        Self {
            node_id: Some(NodeId::two_byte(id)),
            ..Self::default()
        }
    }

    /// 构造包裹 FourByte 数值标识符的扩展标识符，无 URI 与 ServerIndex。
    #[must_use]
    pub fn four_byte(namespace: u8, id: u16) -> Self {
        Self {
            node_id: Some(NodeId::four_byte(namespace, id)),
            ..Self::default()
        }
    }

    /// 查询 NamespaceUri 存在标志；基础标识符缺席时返回 `false`。
    #[must_use]
    pub fn has_namespace_uri(&self) -> bool {
        self.node_id.as_ref().is_some_and(NodeId::has_uri_flag)
    }

    /// 查询 ServerIndex 存在标志；基础标识符缺席时返回 `false`。
    #[must_use]
    pub fn has_server_index(&self) -> bool {
        self.node_id.as_ref().is_some_and(NodeId::has_index_flag)
    }

    /// 返回编码所需的精确字节数，调用方应据此为
    /// [`encode_into`](Self::encode_into) 预留缓冲。
    ///
    /// 基础标识符缺席时返回 0（空值状态的占用长度定义，而非错误）。
    #[must_use]
    pub fn required_len(&self) -> usize {
        let Some(node) = &self.node_id else {
            return 0;
        };
        let mut len = node.occupied_len();
        if node.has_uri_flag() {
            // 标志置位而文本缺失时按 null 字符串计长，与编码路径一致。
            len += self
                .namespace_uri
                .as_ref()
                .map_or(UaString::null().occupied_len(), UaString::occupied_len);
        }
        if node.has_index_flag() {
            len += SERVER_INDEX_LEN;
        }
        len
    }

    /// 自缓冲起始位置解码一个扩展标识符。
    pub fn decode(b: &[u8]) -> Result<Self, NodeIdParseError> {
        let mut expanded = Self::default();
        expanded.decode_from_bytes(b)?;
        Ok(expanded)
    }

    /// 自缓冲起始位置解码，成功后覆盖 `self`。
    ///
    /// - **步骤**：先解码基础标识符（结构完全由其掩码位决定），再按标志位
    ///   依次消费可选 URI 与 ServerIndex；
    /// - **短缓冲终态**：基础标识符之后剩余不足 2 字节时按「无可选字段」
    ///   成功返回；
    /// - **失败语义**：所有字段在整体成功前只写入局部变量，任何错误返回时
    ///   `self` 均保持原状。
    pub fn decode_from_bytes(&mut self, b: &[u8]) -> Result<(), NodeIdParseError> {
        let mut node = NodeId::default();
        node.decode_from_bytes(b)?;

        let mut rest = &b[node.occupied_len()..];
        let mut namespace_uri = None;
        let mut server_index = 0u32;
        if rest.len() >= OPTIONAL_FIELDS_MIN_LEN {
            if node.has_uri_flag() {
                let mut uri = UaString::null();
                uri.decode_from_bytes(rest)?;
                rest = &rest[uri.occupied_len()..];
                namespace_uri = Some(uri);
            }
            if node.has_index_flag() {
                if rest.len() < SERVER_INDEX_LEN {
                    return Err(NodeIdParseError::BufferTooShort);
                }
                server_index = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]);
            }
        }

        self.node_id = Some(node);
        self.namespace_uri = namespace_uri;
        self.server_index = server_index;
        Ok(())
    }

    /// 将该值编码到缓冲起始位置，返回写入的字节数。
    ///
    /// - **布局**：基础标识符、URI（若标志置位）、ServerIndex（若标志置位）
    ///   依次紧排，无填充、无整体长度前缀；
    /// - **失败语义**：`dst` 短于 [`required_len`](Self::required_len) 时返回
    ///   [`NodeIdEncodeError::BufferTooSmall`]，检查先于任何写入；
    /// - **空值状态**：基础标识符缺席时写入 0 字节并成功返回。
    pub fn encode_into(&self, dst: &mut [u8]) -> Result<usize, NodeIdEncodeError> {
        if dst.len() < self.required_len() {
            return Err(NodeIdEncodeError::BufferTooSmall);
        }
        let Some(node) = &self.node_id else {
            return Ok(0);
        };

        let mut cursor = node.encode_into(dst)?;
        if node.has_uri_flag() {
            let written = match &self.namespace_uri {
                Some(uri) => uri.encode_into(&mut dst[cursor..])?,
                None => UaString::null().encode_into(&mut dst[cursor..])?,
            };
            cursor += written;
        }
        if node.has_index_flag() {
            dst[cursor..cursor + SERVER_INDEX_LEN]
                .copy_from_slice(&self.server_index.to_le_bytes());
            cursor += SERVER_INDEX_LEN;
        }
        Ok(cursor)
    }

    /// 便捷编码：分配恰好 [`required_len`](Self::required_len) 字节并写入。
    pub fn encode(&self) -> Result<Vec<u8>, NodeIdEncodeError> {
        let mut buf = vec![0u8; self.required_len()];
        self.encode_into(&mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_byte_encodes_with_no_trailing_bytes() {
        let expanded = ExpandedNodeId::two_byte(5);
        assert_eq!(expanded.required_len(), 2);
        assert_eq!(expanded.encode().expect("应可编码"), [0x00, 0x05]);
        assert!(!expanded.has_namespace_uri());
        assert!(!expanded.has_server_index());
    }

    #[test]
    fn four_byte_round_trip() {
        let expanded = ExpandedNodeId::four_byte(1, 300);
        let encoded = expanded.encode().expect("应可编码");
        assert_eq!(encoded.len(), expanded.required_len());

        let decoded = ExpandedNodeId::decode(&encoded).expect("应可解码");
        assert_eq!(decoded, expanded);
        assert_eq!(decoded.node_id.as_ref().map(NodeId::namespace), Some(1));
        assert!(!decoded.has_namespace_uri());
        assert!(!decoded.has_server_index());
    }

    #[test]
    fn uri_and_server_index_round_trip() {
        let expanded = ExpandedNodeId::new(
            true,
            true,
            NodeId::numeric(0, 2048),
            "http://example.org",
            42,
        );
        let encoded = expanded.encode().expect("应可编码");
        assert_eq!(encoded.len(), expanded.required_len());

        let decoded = ExpandedNodeId::decode(&encoded).expect("应可解码");
        assert!(decoded.has_namespace_uri());
        assert_eq!(
            decoded.namespace_uri.as_ref().and_then(UaString::as_str),
            Some("http://example.org")
        );
        assert!(decoded.has_server_index());
        assert_eq!(decoded.server_index, 42);
        assert_eq!(decoded, expanded);
    }

    #[test]
    fn empty_uri_presence_is_controlled_by_flag_not_length() {
        let expanded = ExpandedNodeId::new(true, false, NodeId::two_byte(1), "", 0);
        assert!(expanded.has_namespace_uri());
        // TwoByte(2) + 空字符串前缀(4)。
        assert_eq!(expanded.required_len(), 6);

        let decoded = ExpandedNodeId::decode(&expanded.encode().expect("应可编码"))
            .expect("应可解码");
        assert!(decoded.has_namespace_uri());
        assert_eq!(
            decoded.namespace_uri.as_ref().and_then(UaString::as_str),
            Some("")
        );
    }

    #[test]
    fn base_identifier_only_buffer_decodes_without_optionals() {
        let decoded = ExpandedNodeId::decode(&[0x00, 0x07]).expect("应可解码");
        assert_eq!(decoded.node_id, Some(NodeId::two_byte(7)));
        assert_eq!(decoded.namespace_uri, None);
        assert_eq!(decoded.server_index, 0);
    }

    #[test]
    fn single_trailing_byte_means_no_optional_fields() {
        // 掩码声明了 URI 与 Index，但基础标识符之后仅剩 1 字节。
        let decoded = ExpandedNodeId::decode(&[0xC0, 0x07, 0xAA]).expect("应按缺席处理");
        assert_eq!(decoded.namespace_uri, None);
        assert_eq!(decoded.server_index, 0);
        assert!(decoded.has_namespace_uri(), "标志位本身仍被保留");
        assert!(decoded.has_server_index());
    }

    #[test]
    fn truncated_server_index_is_a_decode_error() {
        // Index 标志置位，剩余 2 字节 ≥ 2 但不足 4。
        let err = ExpandedNodeId::decode(&[0x40, 0x07, 0x2A, 0x00]).unwrap_err();
        assert_eq!(err, NodeIdParseError::BufferTooShort);
    }

    #[test]
    fn malformed_uri_propagates_from_string_codec() {
        // URI 标志置位，长度前缀为 -2（null 以外的负值）。
        let err = ExpandedNodeId::decode(&[0x80, 0x07, 0xFE, 0xFF, 0xFF, 0xFF]).unwrap_err();
        assert!(matches!(err, NodeIdParseError::MalformedField(_)));
    }

    #[test]
    fn decode_failure_leaves_target_unchanged() {
        let mut target = ExpandedNodeId::four_byte(3, 3);
        let before = target.clone();
        assert!(target.decode_from_bytes(&[0x40, 0x07, 0x2A, 0x00]).is_err());
        assert_eq!(target, before);
    }

    #[test]
    fn absent_base_identifier_reports_zero_size() {
        let empty = ExpandedNodeId::default();
        assert_eq!(empty.required_len(), 0);
        assert!(!empty.has_namespace_uri());
        assert!(!empty.has_server_index());
        assert_eq!(empty.encode().expect("空值状态应编码为空"), Vec::<u8>::new());
    }

    #[test]
    fn encode_into_undersized_buffer_fails_without_partial_write() {
        let expanded = ExpandedNodeId::new(true, true, NodeId::two_byte(1), "uri", 7);
        let mut dst = vec![0u8; expanded.required_len() - 1];
        assert_eq!(
            expanded.encode_into(&mut dst).unwrap_err(),
            NodeIdEncodeError::BufferTooSmall
        );
        assert!(dst.iter().all(|byte| *byte == 0), "不得写入部分字节");
    }

    #[test]
    fn flag_gated_uri_is_never_read_when_flag_clear() {
        // 无标志的 TwoByte 之后跟随足以伪装成字符串的字节，解码必须忽略它们。
        let mut wire = vec![0x00, 0x09];
        wire.extend_from_slice(&3i32.to_le_bytes());
        wire.extend_from_slice(b"abc");
        let decoded = ExpandedNodeId::decode(&wire).expect("应可解码");
        assert_eq!(decoded.namespace_uri, None);
        assert_eq!(decoded.server_index, 0);
    }

    #[test]
    fn server_index_without_uri_round_trips() {
        let expanded = ExpandedNodeId::new(false, true, NodeId::four_byte(0, 55), "", 0xDEAD);
        let encoded = expanded.encode().expect("应可编码");
        assert_eq!(encoded.len(), 4 + 4);

        let decoded = ExpandedNodeId::decode(&encoded).expect("应可解码");
        assert!(!decoded.has_namespace_uri());
        assert!(decoded.has_server_index());
        assert_eq!(decoded.server_index, 0xDEAD);
        assert_eq!(decoded, expanded);
    }
}
