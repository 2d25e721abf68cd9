#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! # uawire-codec-nodeid
//!
//! ## 教案目的（Why）
//! - **定位**：OPC UA 地址空间节点标识符的二进制编解码，覆盖基础 [`NodeId`]
//!   的六种线上形态与跨服务器边界使用的 [`ExpandedNodeId`] 扩展形态。
//! - **架构角色**：标识符是协议族中几乎所有服务消息的字段原料；本 crate 仅交付
//!   结构化编解码本身，传输分帧与消息分发由上层 crate 承担。
//! - **设计策略**：ExpandedNodeId 的两个可选字段（NamespaceUri 与 ServerIndex）
//!   的存在标志物理上存储在基础 NodeId 的编码掩码字节高两位中，本实现坚持
//!   「标志只读写掩码、永不本地缓存」，从构造上消除双份状态的同步问题。
//!
//! ## 交互契约（What）
//! - **依赖输入**：`uawire-codec-builtin` 提供的长度前缀字符串、字节串与 GUID 子编解码；
//! - **输出职责**：
//!   1. [`NodeId`] 按掩码低位分派 TwoByte/FourByte/Numeric/String/Guid/Opaque 六种布局；
//!   2. [`ExpandedNodeId`] 按「基础标识符 → 可选 URI → 可选服务器索引」顺序组合编码；
//!   3. 两者均暴露 `decode_from_bytes` / `encode_into` / 占用长度三件套与便捷分配入口。
//! - **前置条件**：编码前调用方须按占用长度预留缓冲；不足时返回错误且不写入任何字节。
//!
//! ## 实现策略（How）
//! - 解码顺序严格先基础标识符后可选字段，因为结构完全由掩码位决定；
//! - 所有失败路径发生在目标值任何字段被写入之前，杜绝半成品状态；
//! - 与 Part 6 的偏差修正：服务器索引读取前显式做边界检查，缺字节返回
//!   [`NodeIdParseError::BufferTooShort`] 而非越界读取。
//!
//! ## 风险提示（Trade-offs）
//! - 基础标识符解码后若剩余字节不足 2，可选字段一律按缺席处理（即便掩码位置位），
//!   与参考线上行为保持一致；该歧义已在类型文档中注明；
//! - 仅处理连续缓冲，分片缓冲需由调用方先行聚合。

extern crate alloc;

mod error;
mod expanded;
mod node_id;

pub use crate::{
    error::{NodeIdEncodeError, NodeIdParseError},
    expanded::ExpandedNodeId,
    node_id::{Identifier, NodeId},
};
