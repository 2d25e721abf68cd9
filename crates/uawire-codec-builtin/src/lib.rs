#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! # uawire-codec-builtin
//!
//! ## 教案目的（Why）
//! - **定位**：OPC UA 二进制协议（Part 6）内建标量类型的编解码基座，覆盖长度前缀字符串、
//!   字节串与 16 字节 GUID 三种被标识符编码直接复用的类型。
//! - **架构角色**：位于 `uawire-codec-nodeid` 之下，为 NodeId 的 String/Guid/Opaque 形态
//!   以及 ExpandedNodeId 的 NamespaceUri 字段提供子编解码单元。
//! - **设计策略**：每个类型自带 `decode_from_bytes` / `encode_into` / `occupied_len` 三件套，
//!   与上层标识符编码的游标推进模型严格对齐。
//!
//! ## 交互契约（What）
//! - **依赖输入**：调用方提供的连续字节切片；解码自切片起始位置消费，编码写入切片起始位置。
//! - **输出职责**：
//!   1. [`UaString`] / [`ByteString`] 实现 `i32` 小端长度前缀约定（`-1` 表示 null）；
//!   2. [`Guid`] 实现固定 16 字节布局（`u32`/`u16`/`u16` 小端 + 8 原始字节）。
//! - **前置条件**：编码前调用方须按 `occupied_len` 预留缓冲；不足时返回错误且不写入任何字节。
//!
//! ## 实现策略（How）
//! - 所有长度检查先于任何写入/读取发生，保证失败路径不产生部分结果；
//! - 错误以轻量枚举表达并手写 `Display`，便于在 `no_std + alloc` 环境中直接使用。
//!
//! ## 风险提示（Trade-offs）
//! - [`UaString`] 在解码时执行 UTF-8 校验；原始字节语义的负载应使用 [`ByteString`]；
//! - 仅处理连续缓冲，分片缓冲需由调用方先行聚合。

extern crate alloc;

mod error;
mod guid;
mod string;

pub use crate::{
    error::{BuiltinEncodeError, BuiltinParseError},
    guid::{GUID_LEN, Guid},
    string::{ByteString, LENGTH_PREFIX_LEN, UaString},
};
