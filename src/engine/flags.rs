//! ### English
//! Bitflags controlling optional surface behaviors.
//!
//! These are passed through the C ABI as a `u32` bitmask.
//!
//! ### 中文
//! 控制 surface 可选行为的位标志（bitflags）。
//!
//! 通过 C ABI 以 `u32` 位掩码传入。

/// ### English
/// Render on demand only (`request_render`, resume, resize) instead of continuously.
///
/// Equivalent to `GLSurfaceView.RENDERMODE_WHEN_DIRTY`; `target_fps` is ignored in this mode.
///
/// ### 中文
/// 仅按需渲染（`request_render`、resume、resize），而不是持续渲染。
///
/// 等价于 `GLSurfaceView.RENDERMODE_WHEN_DIRTY`；该模式下忽略 `target_fps`。
pub const SAN_ANGELES_SURFACE_FLAG_RENDER_WHEN_DIRTY: u32 = 1 << 0;

/// ### English
/// Deliver every queued touch move to the engine instead of only the latest of a run.
///
/// ### 中文
/// 把每个排队的触摸移动都交给引擎，而不是只保留连续移动中的最后一个。
pub const SAN_ANGELES_SURFACE_FLAG_NO_TOUCH_COALESCING: u32 = 1 << 1;
