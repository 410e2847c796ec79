//! ### English
//! C ABI surface for `san_angeles_bridge`.
//! All exported symbols are `extern "C"` functions; structs are `#[repr(C)]`.
//! The native engine is supplied by the host as a table of function pointers, so this library
//! never links against the engine's symbols directly.
//!
//! ### 中文
//! `san_angeles_bridge` 的 C ABI 接口层。
//! 所有导出符号均为 `extern "C"` 函数；结构体使用 `#[repr(C)]`。
//! 原生引擎由宿主以函数指针表的形式提供，因此本库从不直接链接引擎符号。

use std::ffi::c_void;

use dpi::PhysicalSize;

use crate::engine::clock::FrameTick;
use crate::engine::flags;
use crate::engine::{EngineHandle, HostController, LifecycleState, NativeEngine, SurfaceConfig};

/// ### English
/// Function table implementing the native engine boundary.
///
/// Every callback receives `user_data` as its first argument and is invoked on the render thread
/// only. `pause`, `resume`, `toggle`, `touch` and `render` are required; `init`, `resize` and
/// `deinit` may be NULL.
///
/// ### 中文
/// 实现原生引擎边界的函数表。
///
/// 每个回调的第一个参数都是 `user_data`，且只会在渲染线程被调用。
/// `pause`、`resume`、`toggle`、`touch`、`render` 为必需；`init`、`resize`、`deinit` 可为 NULL。
#[repr(C)]
#[derive(Clone, Copy)]
pub struct SanAngelesEngineVTable {
    pub user_data: *mut c_void,
    pub pause: Option<unsafe extern "C" fn(user_data: *mut c_void)>,
    pub resume: Option<unsafe extern "C" fn(user_data: *mut c_void)>,
    pub toggle: Option<unsafe extern "C" fn(user_data: *mut c_void)>,
    pub touch: Option<unsafe extern "C" fn(user_data: *mut c_void, x: f32, y: f32)>,
    /// ### English
    /// Renders one frame: `tick` is the animation time in milliseconds, `width`/`height` the
    /// drawable size.
    ///
    /// ### 中文
    /// 渲染一帧：`tick` 为动画时间（毫秒），`width`/`height` 为可绘制区域尺寸。
    pub render: Option<unsafe extern "C" fn(user_data: *mut c_void, tick: i64, width: i32, height: i32)>,
    pub init: Option<unsafe extern "C" fn(user_data: *mut c_void, width: i32, height: i32)>,
    pub resize: Option<unsafe extern "C" fn(user_data: *mut c_void, width: i32, height: i32)>,
    pub deinit: Option<unsafe extern "C" fn(user_data: *mut c_void)>,
}

/// ### English
/// Required callbacks, resolved once at creation.
///
/// ### 中文
/// 创建时解析出的必需回调。
struct VTableEngine {
    user_data: *mut c_void,
    pause: unsafe extern "C" fn(*mut c_void),
    resume: unsafe extern "C" fn(*mut c_void),
    toggle: unsafe extern "C" fn(*mut c_void),
    touch: unsafe extern "C" fn(*mut c_void, f32, f32),
    render: unsafe extern "C" fn(*mut c_void, i64, i32, i32),
    init: Option<unsafe extern "C" fn(*mut c_void, i32, i32)>,
    resize: Option<unsafe extern "C" fn(*mut c_void, i32, i32)>,
    deinit: Option<unsafe extern "C" fn(*mut c_void)>,
    /// ### English
    /// Size passed to the latest `init`/`resize`; used when a frame is requested without a tick.
    ///
    /// ### 中文
    /// 最近一次 `init`/`resize` 传入的尺寸；在没有时钟读数的情况下请求帧时使用。
    size: PhysicalSize<u32>,
}

/*
### English
The host guarantees `user_data` may be used from the render thread; all calls are serialized
through that single thread.

### 中文
宿主保证 `user_data` 可在渲染线程使用；所有调用都经由该单一线程串行执行。
*/
unsafe impl Send for VTableEngine {}

impl VTableEngine {
    fn from_vtable(vtable: &SanAngelesEngineVTable) -> Option<Self> {
        Some(Self {
            user_data: vtable.user_data,
            pause: vtable.pause?,
            resume: vtable.resume?,
            toggle: vtable.toggle?,
            touch: vtable.touch?,
            render: vtable.render?,
            init: vtable.init,
            resize: vtable.resize,
            deinit: vtable.deinit,
            size: PhysicalSize::new(1, 1),
        })
    }
}

#[inline]
fn to_c_extent(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl NativeEngine for VTableEngine {
    fn pause(&mut self) {
        unsafe { (self.pause)(self.user_data) }
    }

    fn resume(&mut self) {
        unsafe { (self.resume)(self.user_data) }
    }

    fn toggle(&mut self) {
        unsafe { (self.toggle)(self.user_data) }
    }

    fn touch(&mut self, x: f32, y: f32) {
        unsafe { (self.touch)(self.user_data, x, y) }
    }

    fn render_frame(&mut self) {
        let tick = FrameTick {
            tick_ms: 0,
            frame_index: 0,
            size: self.size,
        };
        self.render_frame_at(&tick);
    }

    fn render_frame_at(&mut self, tick: &FrameTick) {
        let tick_ms = i64::try_from(tick.tick_ms).unwrap_or(i64::MAX);
        unsafe {
            (self.render)(
                self.user_data,
                tick_ms,
                to_c_extent(tick.size.width),
                to_c_extent(tick.size.height),
            )
        }
    }

    fn init(&mut self, size: PhysicalSize<u32>) {
        self.size = size;
        if let Some(init) = self.init {
            unsafe { init(self.user_data, to_c_extent(size.width), to_c_extent(size.height)) }
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.size = size;
        if let Some(resize) = self.resize {
            unsafe { resize(self.user_data, to_c_extent(size.width), to_c_extent(size.height)) }
        }
    }

    fn deinit(&mut self) {
        if let Some(deinit) = self.deinit {
            unsafe { deinit(self.user_data) }
        }
    }
}

#[repr(C)]
/// ### English
/// Opaque surface handle owning the render thread.
///
/// ### 中文
/// 不透明 surface 句柄，持有渲染线程。
pub struct SanAngelesSurface {
    host: HostController,
}

/// ### English
/// C ABI version for `san_angeles_bridge`.
///
/// ### 中文
/// `san_angeles_bridge` 的 C ABI 版本号。
const SAN_ANGELES_ABI_VERSION: u32 = 1;

pub const SAN_ANGELES_STATE_UNINITIALIZED: u32 = LifecycleState::Uninitialized as u32;
pub const SAN_ANGELES_STATE_ACTIVE: u32 = LifecycleState::Active as u32;
pub const SAN_ANGELES_STATE_SUSPENDED: u32 = LifecycleState::Suspended as u32;
pub const SAN_ANGELES_STATE_DESTROYED: u32 = LifecycleState::Destroyed as u32;

#[unsafe(no_mangle)]
/// ### English
/// Returns the C ABI version.
///
/// ### 中文
/// 返回 C ABI 版本号。
pub extern "C" fn san_angeles_abi_version() -> u32 {
    SAN_ANGELES_ABI_VERSION
}

#[unsafe(no_mangle)]
/// ### English
/// Returns `SAN_ANGELES_SURFACE_FLAG_RENDER_WHEN_DIRTY`.
/// (Constant getter; avoids relying on C headers.)
///
/// ### 中文
/// 返回 `SAN_ANGELES_SURFACE_FLAG_RENDER_WHEN_DIRTY`。
/// （常量获取函数；避免依赖 C 头文件。）
pub extern "C" fn san_angeles_surface_flag_render_when_dirty() -> u32 {
    flags::SAN_ANGELES_SURFACE_FLAG_RENDER_WHEN_DIRTY
}

#[unsafe(no_mangle)]
/// ### English
/// Returns `SAN_ANGELES_SURFACE_FLAG_NO_TOUCH_COALESCING`.
///
/// ### 中文
/// 返回 `SAN_ANGELES_SURFACE_FLAG_NO_TOUCH_COALESCING`。
pub extern "C" fn san_angeles_surface_flag_no_touch_coalescing() -> u32 {
    flags::SAN_ANGELES_SURFACE_FLAG_NO_TOUCH_COALESCING
}

#[unsafe(no_mangle)]
/// ### English
/// Creates a render surface (state `Uninitialized`) driving the engine described by `vtable`.
///
/// Returns NULL if `vtable` is NULL, a required callback is missing, or another surface already
/// owns the process-wide engine handle.
///
/// `target_fps = 0` renders as fast as possible (ignored with `RENDER_WHEN_DIRTY`).
///
/// ### 中文
/// 创建驱动 `vtable` 所描述引擎的渲染 surface（状态为 `Uninitialized`）。
///
/// 若 `vtable` 为 NULL、缺少必需回调，或另一个 surface 已持有进程级引擎句柄，则返回 NULL。
///
/// `target_fps = 0` 表示尽可能快地渲染（设置 `RENDER_WHEN_DIRTY` 时忽略）。
pub unsafe extern "C" fn san_angeles_surface_create(
    vtable: *const SanAngelesEngineVTable,
    width: u32,
    height: u32,
    target_fps: u32,
    surface_flags: u32,
) -> *mut SanAngelesSurface {
    if vtable.is_null() {
        return std::ptr::null_mut();
    }

    let Some(engine) = VTableEngine::from_vtable(unsafe { &*vtable }) else {
        log::error!("engine vtable is missing a required callback");
        return std::ptr::null_mut();
    };

    let engine = match EngineHandle::acquire(engine) {
        Ok(engine) => engine,
        Err(err) => {
            log::error!("cannot create surface: {err}");
            return std::ptr::null_mut();
        }
    };

    let config = SurfaceConfig::from_flags(width, height, target_fps, surface_flags);
    let host = HostController::on_create(engine, config);
    Box::into_raw(Box::new(SanAngelesSurface { host }))
}

#[unsafe(no_mangle)]
/// ### English
/// Frees a surface created by `san_angeles_surface_create` (tearing it down if still alive).
///
/// ### 中文
/// 释放由 `san_angeles_surface_create` 创建的 surface（若仍存活则先拆除）。
pub unsafe extern "C" fn san_angeles_surface_free(surface: *mut SanAngelesSurface) {
    if surface.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(surface));
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Activity `onPause`: blocks until the render thread is quiescent and the engine is paused.
///
/// ### 中文
/// Activity `onPause`：阻塞直到渲染线程静止且引擎已暂停。
pub unsafe extern "C" fn san_angeles_surface_on_pause(surface: *mut SanAngelesSurface) {
    if surface.is_null() {
        return;
    }
    unsafe { (*surface).host.on_pause() };
}

#[unsafe(no_mangle)]
/// ### English
/// Activity `onResume`.
///
/// ### 中文
/// Activity `onResume`。
pub unsafe extern "C" fn san_angeles_surface_on_resume(surface: *mut SanAngelesSurface) {
    if surface.is_null() {
        return;
    }
    unsafe { (*surface).host.on_resume() };
}

#[unsafe(no_mangle)]
/// ### English
/// View `onTouchEvent` with the raw `MotionEvent.getAction()` value. Returns `true` when the
/// event is consumed.
///
/// ### 中文
/// View `onTouchEvent`，传入原始 `MotionEvent.getAction()` 值。事件被消费时返回 `true`。
pub unsafe extern "C" fn san_angeles_surface_on_touch_event(
    surface: *mut SanAngelesSurface,
    x: f32,
    y: f32,
    action: i32,
) -> bool {
    if surface.is_null() {
        return false;
    }
    unsafe { (*surface).host.on_touch_event(x, y, action) }
}

#[unsafe(no_mangle)]
/// ### English
/// Toggles the engine's animation pause flag.
///
/// ### 中文
/// 切换引擎动画的暂停标记。
pub unsafe extern "C" fn san_angeles_surface_toggle(surface: *mut SanAngelesSurface) {
    if surface.is_null() {
        return;
    }
    unsafe { (*surface).host.on_toggle_animation() };
}

#[unsafe(no_mangle)]
/// ### English
/// Requests one frame (on-demand render mode, `SAN_ANGELES_SURFACE_FLAG_RENDER_WHEN_DIRTY`).
///
/// ### 中文
/// 请求渲染一帧（按需渲染模式，`SAN_ANGELES_SURFACE_FLAG_RENDER_WHEN_DIRTY`）。
pub unsafe extern "C" fn san_angeles_surface_request_render(surface: *mut SanAngelesSurface) {
    if surface.is_null() {
        return;
    }
    unsafe { (*surface).host.on_request_render() };
}

#[unsafe(no_mangle)]
/// ### English
/// Window surface created with the given drawable size.
///
/// ### 中文
/// 以给定的可绘制尺寸创建了窗口 surface。
pub unsafe extern "C" fn san_angeles_surface_created(
    surface: *mut SanAngelesSurface,
    width: u32,
    height: u32,
) {
    if surface.is_null() {
        return;
    }
    unsafe {
        (*surface)
            .host
            .on_surface_created(PhysicalSize::new(width, height))
    };
}

#[unsafe(no_mangle)]
/// ### English
/// Drawable size changed.
///
/// ### 中文
/// 可绘制区域尺寸变化。
pub unsafe extern "C" fn san_angeles_surface_changed(
    surface: *mut SanAngelesSurface,
    width: u32,
    height: u32,
) {
    if surface.is_null() {
        return;
    }
    unsafe {
        (*surface)
            .host
            .on_surface_changed(PhysicalSize::new(width, height))
    };
}

#[unsafe(no_mangle)]
/// ### English
/// Window surface destroyed (graphics context lost).
///
/// ### 中文
/// 窗口 surface 已销毁（图形上下文丢失）。
pub unsafe extern "C" fn san_angeles_surface_destroyed(surface: *mut SanAngelesSurface) {
    if surface.is_null() {
        return;
    }
    unsafe { (*surface).host.on_surface_destroyed() };
}

#[unsafe(no_mangle)]
/// ### English
/// Activity `onDestroy`: moves the surface to `Destroyed`. Any later call on this surface other
/// than `san_angeles_surface_free`/`san_angeles_surface_state` aborts the process.
///
/// ### 中文
/// Activity `onDestroy`：将 surface 置为 `Destroyed`。之后除
/// `san_angeles_surface_free`/`san_angeles_surface_state` 以外的任何调用都会终止进程。
pub unsafe extern "C" fn san_angeles_surface_on_destroy(surface: *mut SanAngelesSurface) {
    if surface.is_null() {
        return;
    }
    unsafe { (*surface).host.on_destroy() };
}

#[unsafe(no_mangle)]
/// ### English
/// Returns the lifecycle state (`SAN_ANGELES_STATE_*`); NULL reports `DESTROYED`.
///
/// ### 中文
/// 返回生命周期状态（`SAN_ANGELES_STATE_*`）；NULL 返回 `DESTROYED`。
pub unsafe extern "C" fn san_angeles_surface_state(surface: *const SanAngelesSurface) -> u32 {
    if surface.is_null() {
        return SAN_ANGELES_STATE_DESTROYED;
    }
    unsafe { (*surface).host.state() as u32 }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI32, AtomicI64, AtomicU32, Ordering};
    use std::time::{Duration, Instant};

    use super::*;
    use crate::engine::handle::serial_guard;

    #[derive(Default)]
    struct Counters {
        pause: AtomicU32,
        resume: AtomicU32,
        touch: AtomicU32,
        render: AtomicU32,
        init: AtomicU32,
        last_tick: AtomicI64,
        last_width: AtomicI32,
        last_height: AtomicI32,
    }

    unsafe fn counters<'a>(user_data: *mut c_void) -> &'a Counters {
        unsafe { &*(user_data as *const Counters) }
    }

    unsafe extern "C" fn on_pause(user_data: *mut c_void) {
        unsafe { counters(user_data) }.pause.fetch_add(1, Ordering::SeqCst);
    }
    unsafe extern "C" fn on_resume(user_data: *mut c_void) {
        unsafe { counters(user_data) }.resume.fetch_add(1, Ordering::SeqCst);
    }
    unsafe extern "C" fn on_toggle(_user_data: *mut c_void) {}
    unsafe extern "C" fn on_touch(user_data: *mut c_void, _x: f32, _y: f32) {
        unsafe { counters(user_data) }.touch.fetch_add(1, Ordering::SeqCst);
    }
    unsafe extern "C" fn on_render(user_data: *mut c_void, tick: i64, w: i32, h: i32) {
        let counters = unsafe { counters(user_data) };
        counters.last_tick.store(tick, Ordering::SeqCst);
        counters.last_width.store(w, Ordering::SeqCst);
        counters.last_height.store(h, Ordering::SeqCst);
        counters.render.fetch_add(1, Ordering::SeqCst);
    }
    unsafe extern "C" fn on_init(user_data: *mut c_void, _w: i32, _h: i32) {
        unsafe { counters(user_data) }.init.fetch_add(1, Ordering::SeqCst);
    }

    fn vtable(counters: &Counters) -> SanAngelesEngineVTable {
        SanAngelesEngineVTable {
            user_data: counters as *const Counters as *mut c_void,
            pause: Some(on_pause),
            resume: Some(on_resume),
            toggle: Some(on_toggle),
            touch: Some(on_touch),
            render: Some(on_render),
            init: Some(on_init),
            resize: None,
            deinit: None,
        }
    }

    fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        condition()
    }

    #[test]
    fn untimed_frame_uses_latest_drawable_size() {
        let counters = Counters::default();
        let mut engine = VTableEngine::from_vtable(&vtable(&counters)).expect("complete vtable");

        engine.init(PhysicalSize::new(800, 600));
        engine.resize(PhysicalSize::new(1024, 768));
        engine.render_frame();

        assert_eq!(counters.render.load(Ordering::SeqCst), 1);
        assert_eq!(counters.last_tick.load(Ordering::SeqCst), 0);
        assert_eq!(counters.last_width.load(Ordering::SeqCst), 1024);
        assert_eq!(counters.last_height.load(Ordering::SeqCst), 768);
        assert_eq!(counters.init.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn null_and_incomplete_vtables_are_rejected() {
        let _serial = serial_guard();

        let surface = unsafe { san_angeles_surface_create(std::ptr::null(), 1, 1, 60, 0) };
        assert!(surface.is_null());

        let counters = Counters::default();
        let mut table = vtable(&counters);
        table.render = None;
        let surface = unsafe { san_angeles_surface_create(&table, 1, 1, 60, 0) };
        assert!(surface.is_null());
    }

    #[test]
    fn null_surface_calls_are_ignored() {
        unsafe {
            san_angeles_surface_on_pause(std::ptr::null_mut());
            san_angeles_surface_on_resume(std::ptr::null_mut());
            assert!(!san_angeles_surface_on_touch_event(std::ptr::null_mut(), 0.0, 0.0, 0));
            assert_eq!(
                san_angeles_surface_state(std::ptr::null()),
                SAN_ANGELES_STATE_DESTROYED
            );
            san_angeles_surface_free(std::ptr::null_mut());
        }
    }

    #[test]
    fn drives_engine_through_the_vtable() {
        let _serial = serial_guard();

        let counters = Counters::default();
        let table = vtable(&counters);
        let surface = unsafe {
            san_angeles_surface_create(
                &table,
                320,
                240,
                0,
                san_angeles_surface_flag_render_when_dirty(),
            )
        };
        assert!(!surface.is_null());

        unsafe {
            assert_eq!(san_angeles_surface_state(surface), SAN_ANGELES_STATE_UNINITIALIZED);
            san_angeles_surface_created(surface, 320, 240);
            san_angeles_surface_on_resume(surface);
            assert_eq!(san_angeles_surface_state(surface), SAN_ANGELES_STATE_ACTIVE);
            assert!(san_angeles_surface_on_touch_event(surface, 1.0, 2.0, 0));
            // ACTION_UP is consumed but never reaches the engine.
            assert!(san_angeles_surface_on_touch_event(surface, 1.0, 2.0, 1));
        }
        assert!(wait_until(|| counters.render.load(Ordering::SeqCst) >= 1));
        unsafe { san_angeles_surface_on_pause(surface) };

        assert_eq!(counters.init.load(Ordering::SeqCst), 1);
        assert_eq!(counters.resume.load(Ordering::SeqCst), 1);
        assert_eq!(counters.touch.load(Ordering::SeqCst), 1);
        assert_eq!(counters.pause.load(Ordering::SeqCst), 1);

        unsafe {
            assert_eq!(san_angeles_surface_state(surface), SAN_ANGELES_STATE_SUSPENDED);
            san_angeles_surface_on_destroy(surface);
            assert_eq!(san_angeles_surface_state(surface), SAN_ANGELES_STATE_DESTROYED);
            san_angeles_surface_free(surface);
        }
    }
}
