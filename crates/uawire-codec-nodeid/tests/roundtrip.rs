//! ExpandedNodeId / NodeId 的随机化 round-trip 性质测试。
//!
//! - **Why**：六种基础形态 × 两个可选字段的组合空间远超手写用例能覆盖的范围，
//!   以 `proptest` 穷举随机组合验证「编码可逆」与「长度自洽」两条核心性质；
//! - **What**：对任意合法构造的值断言 `decode(encode(v)) == v` 且
//!   `encode(v).len() == required_len(v)`；
//! - **How**：策略层面保证值由构造函数产出（掩码标志与字段取值天然一致），
//!   与 crate 文档中「手工拼装字段不保证 round-trip」的契约对齐。

use proptest::prelude::*;
use uawire_codec_builtin::Guid;
use uawire_codec_nodeid::{ExpandedNodeId, NodeId};

fn node_id_strategy() -> impl Strategy<Value = NodeId> {
    prop_oneof![
        any::<u8>().prop_map(NodeId::two_byte),
        (any::<u8>(), any::<u16>()).prop_map(|(ns, id)| NodeId::four_byte(ns, id)),
        (any::<u16>(), any::<u32>()).prop_map(|(ns, id)| NodeId::numeric(ns, id)),
        (any::<u16>(), "[ -~]{0,32}").prop_map(|(ns, text)| NodeId::string(ns, &text)),
        (any::<u16>(), any::<u32>(), any::<u16>(), any::<u16>(), any::<[u8; 8]>())
            .prop_map(|(ns, d1, d2, d3, d4)| NodeId::guid(ns, Guid::new(d1, d2, d3, d4))),
        (any::<u16>(), proptest::collection::vec(any::<u8>(), 0..32))
            .prop_map(|(ns, bytes)| NodeId::opaque(ns, bytes)),
    ]
}

fn expanded_strategy() -> impl Strategy<Value = ExpandedNodeId> {
    (
        node_id_strategy(),
        proptest::option::of("[ -~]{0,24}"),
        any::<bool>(),
        any::<u32>(),
    )
        .prop_map(|(node, uri, has_index, index)| {
            ExpandedNodeId::new(
                uri.is_some(),
                has_index,
                node,
                uri.as_deref().unwrap_or(""),
                if has_index { index } else { 0 },
            )
        })
}

proptest! {
    #[test]
    fn encode_then_decode_is_identity(expanded in expanded_strategy()) {
        let encoded = expanded.encode().expect("合法构造的值应可编码");
        let decoded = ExpandedNodeId::decode(&encoded).expect("自编码字节应可解码");
        prop_assert_eq!(decoded, expanded);
    }

    #[test]
    fn encoded_length_matches_required_len(expanded in expanded_strategy()) {
        let encoded = expanded.encode().expect("合法构造的值应可编码");
        prop_assert_eq!(encoded.len(), expanded.required_len());
    }

    #[test]
    fn optional_fields_only_appear_when_flagged(node in node_id_strategy()) {
        // 未置位任何标志：编码只含基础标识符字节。
        let expanded = ExpandedNodeId::new(false, false, node.clone(), "", 0);
        let encoded = expanded.encode().expect("应可编码");
        prop_assert_eq!(encoded.len(), node.occupied_len());
        prop_assert_eq!(encoded, node.encode().expect("基础标识符应可编码"));
    }

    #[test]
    fn base_node_round_trip(node in node_id_strategy()) {
        let encoded = node.encode().expect("应可编码");
        prop_assert_eq!(encoded.len(), node.occupied_len());
        let decoded = NodeId::decode(&encoded).expect("应可解码");
        prop_assert_eq!(decoded, node);
    }

    #[test]
    fn undersized_encode_buffer_is_rejected(expanded in expanded_strategy()) {
        let required = expanded.required_len();
        prop_assume!(required > 0);
        let mut dst = vec![0u8; required - 1];
        prop_assert!(expanded.encode_into(&mut dst).is_err());
        prop_assert!(dst.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn decoder_never_panics_on_arbitrary_input(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        // 解码要么成功要么返回类型化错误，绝不越界或 panic。
        let _ = ExpandedNodeId::decode(&bytes);
    }
}
