#![no_main]

use libfuzzer_sys::fuzz_target;
use uawire_codec_nodeid::ExpandedNodeId;

// Fuzz 不变量：
//
// - **Why**：解码器面对任意字节流必须要么成功要么返回类型化错误，绝不越界读取；
//   历史上参考实现在 ServerIndex 读取处存在未检查的越界缺陷，本目标持续回归该路径。
// - **What**：对解码成功的值断言「规范形态不动点」——解码后重编码得到的字节流
//   再次解码、再次编码必须产出完全相同的字节。不直接断言与原始输入逐字节相等，
//   因为解码合法地忽略尾部多余字节，且畸形的「标志置位但字节缺席」输入会被
//   规范化为 null URI。
fuzz_target!(|data: &[u8]| {
    let Ok(decoded) = ExpandedNodeId::decode(data) else {
        return;
    };

    let canonical = decoded.encode().expect("已解码的值必须可编码");
    let reparsed = ExpandedNodeId::decode(&canonical).expect("规范形态必须可再次解码");
    let stable = reparsed.encode().expect("再次编码必须成功");
    assert_eq!(stable, canonical, "规范形态应为编码不动点");
});
