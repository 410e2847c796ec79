//! ### English
//! Error type returned by render-surface operations.
//!
//! ### 中文
//! 渲染 surface 操作返回的错误类型。

use std::io;

use thiserror::Error;

/// ### English
/// Failures surfaced by the render surface.
///
/// Redundant lifecycle calls are not errors; they return `Ok(())`.
///
/// ### 中文
/// 渲染 surface 报告的失败。
///
/// 冗余的生命周期调用不算错误，会返回 `Ok(())`。
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// ### English
    /// A command was issued after `destroy()`: a lifecycle contract violation by the host.
    ///
    /// ### 中文
    /// 在 `destroy()` 之后仍发出命令：宿主违反了生命周期契约。
    #[error("render surface used after destroy")]
    Destroyed,
    /// ### English
    /// Another engine handle is still alive in this process.
    ///
    /// ### 中文
    /// 本进程中仍有另一个引擎句柄存活。
    #[error("engine handle already acquired in this process")]
    EngineHandleTaken,
    /// ### English
    /// The render thread terminated abnormally and took the engine handle with it.
    ///
    /// ### 中文
    /// 渲染线程异常终止，引擎句柄随之丢失。
    #[error("engine handle lost: render thread terminated abnormally")]
    EngineLost,
    #[error("failed to spawn render thread: {0}")]
    Spawn(#[source] io::Error),
}
