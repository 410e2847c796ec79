/// ### English
/// `san_angeles_bridge` crate root.
/// Exposes the host-facing C ABI via `ffi`; the render-surface lifecycle bridge lives under `engine`.
///
/// ### 中文
/// `san_angeles_bridge` 的 crate 根。
/// 通过 `ffi` 导出面向宿主的 C ABI；渲染 surface 生命周期桥接实现位于 `engine` 模块。
pub mod engine;
pub mod ffi;
