/// ### English
/// Render-surface lifecycle bridge (state machine, render thread, engine boundary, host glue).
///
/// ### 中文
/// 渲染 surface 生命周期桥接（状态机、渲染线程、引擎边界、宿主胶水层）。
pub mod boundary;
pub mod clock;
pub mod config;
pub mod error;
pub mod flags;
pub mod handle;
pub mod host;
pub mod input_types;
pub mod runtime;
pub mod state;

pub use boundary::NativeEngine;
pub use clock::FrameTick;
pub use config::{RenderMode, SurfaceConfig};
pub use error::SurfaceError;
pub use handle::EngineHandle;
pub use host::HostController;
pub use input_types::{TouchAction, TouchDisposition, TouchEvent, TouchKind};
pub use runtime::RenderSurface;
pub use state::{LifecycleEvent, LifecycleState};
