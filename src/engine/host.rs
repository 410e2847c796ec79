//! ### English
//! Host controller: the activity-side glue that owns the render surface and forwards OS
//! lifecycle callbacks to it.
//!
//! ### 中文
//! 宿主控制器：Activity 侧的胶水层，持有渲染 surface 并把系统生命周期回调转发给它。

use dpi::PhysicalSize;

use super::config::SurfaceConfig;
use super::error::SurfaceError;
use super::handle::EngineHandle;
use super::input_types::{TouchAction, TouchDisposition};
use super::runtime::RenderSurface;
use super::state::LifecycleState;

/// ### English
/// Owns the application window's render surface.
///
/// Calls after `on_destroy` are lifecycle contract violations and panic.
///
/// ### 中文
/// 持有应用窗口的渲染 surface。
///
/// 在 `on_destroy` 之后的调用属于违反生命周期契约，会 panic。
pub struct HostController {
    surface: RenderSurface,
}

impl HostController {
    /// ### English
    /// Allocates the render surface in the `Uninitialized` state.
    ///
    /// ### 中文
    /// 分配处于 `Uninitialized` 状态的渲染 surface。
    pub fn on_create(engine: EngineHandle, config: SurfaceConfig) -> Self {
        log::debug!("host created ({:?})", config.render_mode);
        Self {
            surface: RenderSurface::new(engine, config),
        }
    }

    #[inline]
    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.surface.state()
    }

    /// ### English
    /// Activity went to the background. Returns only once the render thread is quiescent.
    ///
    /// ### 中文
    /// Activity 进入后台。仅在渲染线程静止后才返回。
    pub fn on_pause(&mut self) {
        let result = self.surface.suspend();
        in_sequence("on_pause", result);
    }

    pub fn on_resume(&mut self) {
        let result = self.surface.resume();
        in_sequence("on_resume", result);
    }

    /// ### English
    /// Forwards a raw `MotionEvent` action. Always returns `true` (the event is consumed), as the
    /// view does on Android.
    ///
    /// ### 中文
    /// 转发原始 `MotionEvent` 动作。与 Android 上的 view 一样，始终返回 `true`（事件已被消费）。
    pub fn on_touch_event(&self, x: f32, y: f32, action: i32) -> bool {
        let action = TouchAction::from_android(action);
        let disposition = in_sequence("on_touch_event", self.surface.on_touch(x, y, action));
        if disposition == Some(TouchDisposition::Dropped) {
            log::trace!("touch {action:?} dropped by surface");
        }
        true
    }

    /// ### English
    /// Menu action: toggles the engine's animation pause flag.
    ///
    /// ### 中文
    /// 菜单动作：切换引擎动画的暂停标记。
    pub fn on_toggle_animation(&self) {
        in_sequence("on_toggle_animation", self.surface.toggle());
    }

    pub fn on_request_render(&self) {
        in_sequence("on_request_render", self.surface.request_render());
    }

    pub fn on_surface_created(&mut self, size: PhysicalSize<u32>) {
        let result = self.surface.surface_created(size);
        in_sequence("on_surface_created", result);
    }

    pub fn on_surface_changed(&mut self, size: PhysicalSize<u32>) {
        let result = self.surface.surface_changed(size);
        in_sequence("on_surface_changed", result);
    }

    pub fn on_surface_destroyed(&mut self) {
        let result = self.surface.surface_destroyed();
        in_sequence("on_surface_destroyed", result);
    }

    /// ### English
    /// Activity is finishing: the surface becomes `Destroyed`.
    ///
    /// ### 中文
    /// Activity 即将结束：surface 进入 `Destroyed` 状态。
    pub fn on_destroy(&mut self) {
        let result = self.surface.destroy();
        in_sequence("on_destroy", result);
    }
}

/// ### English
/// Applies the host's error policy: `Destroyed` is fatal, anything else is logged.
///
/// ### 中文
/// 应用宿主的错误策略：`Destroyed` 为致命错误，其它错误仅记录日志。
fn in_sequence<T>(callback: &str, result: Result<T, SurfaceError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(SurfaceError::Destroyed) => {
            log::error!("{callback} called after on_destroy");
            panic!("lifecycle contract violation: {callback} called after on_destroy");
        }
        Err(err) => {
            log::error!("{callback} failed: {err}");
            None
        }
    }
}
