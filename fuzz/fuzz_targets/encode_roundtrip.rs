#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use uawire_codec_builtin::Guid;
use uawire_codec_nodeid::{ExpandedNodeId, NodeId};

/// Fuzz 指令：描述一次合法构造的扩展标识符。
///
/// - **Why**：`decode_expanded` 目标只覆盖「任意字节 → 解码」方向；本结构从构造方向
///   穷举六种基础形态与两个可选字段的组合，验证编码可逆与长度自洽在全组合空间成立。
/// - **How**：由 `Arbitrary` 派生随机形态与负载，经构造函数产出掩码标志与字段取值
///   天然一致的值（与 crate 契约对齐），再做 encode → decode 对比。
/// - **What**：对每个生成值断言 `encode(v).len() == required_len(v)` 且
///   `decode(encode(v)) == v`。
#[derive(Debug, Arbitrary)]
struct RoundTripCase {
    base: BaseCase,
    uri: Option<String>,
    server_index: Option<u32>,
}

/// 基础标识符的随机形态。
#[derive(Debug, Arbitrary)]
enum BaseCase {
    TwoByte(u8),
    FourByte { namespace: u8, id: u16 },
    Numeric { namespace: u16, id: u32 },
    Text { namespace: u16, value: String },
    Guid { namespace: u16, d1: u32, d2: u16, d3: u16, d4: [u8; 8] },
    Opaque { namespace: u16, value: Vec<u8> },
}

impl BaseCase {
    fn into_node_id(self) -> NodeId {
        match self {
            Self::TwoByte(id) => NodeId::two_byte(id),
            Self::FourByte { namespace, id } => NodeId::four_byte(namespace, id),
            Self::Numeric { namespace, id } => NodeId::numeric(namespace, id),
            Self::Text { namespace, value } => NodeId::string(namespace, &value),
            Self::Guid {
                namespace,
                d1,
                d2,
                d3,
                d4,
            } => NodeId::guid(namespace, Guid::new(d1, d2, d3, d4)),
            Self::Opaque { namespace, value } => NodeId::opaque(namespace, value),
        }
    }
}

fuzz_target!(|case: RoundTripCase| {
    let expanded = ExpandedNodeId::new(
        case.uri.is_some(),
        case.server_index.is_some(),
        case.base.into_node_id(),
        case.uri.as_deref().unwrap_or(""),
        case.server_index.unwrap_or(0),
    );

    let encoded = expanded.encode().expect("合法构造的值必须可编码");
    assert_eq!(encoded.len(), expanded.required_len(), "长度必须自洽");

    let decoded = ExpandedNodeId::decode(&encoded).expect("自编码字节必须可解码");
    assert_eq!(decoded, expanded, "编码必须可逆");
});
