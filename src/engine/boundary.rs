//! ### English
//! Native engine boundary: the command surface of the (external) rendering engine.
//!
//! Every method is called from the render thread only, one call at a time. Implementations do
//! not need to be thread-safe beyond being movable onto that thread (`Send`).
//!
//! ### 中文
//! 原生引擎边界：（外部）渲染引擎的命令接口。
//!
//! 所有方法只会在渲染线程上被逐个调用。实现者除了可被移动到该线程（`Send`）之外，
//! 无需保证线程安全。

use dpi::PhysicalSize;

use super::clock::FrameTick;

/// ### English
/// Commands understood by the native rendering engine.
///
/// The five required methods are the whole lifecycle contract. The provided methods map the
/// graphics-context callbacks (context created, drawable resized, context lost) and default to
/// no-ops, so an engine that only implements the core commands still works.
///
/// ### 中文
/// 原生渲染引擎可理解的命令。
///
/// 五个必需方法构成完整的生命周期契约。提供的默认方法对应图形上下文回调
/// （上下文创建、尺寸变化、上下文丢失），默认为空操作，
/// 因此只实现核心命令的引擎也能正常工作。
pub trait NativeEngine: Send {
    /// ### English
    /// Suspends the engine's timers / animation clock.
    ///
    /// ### 中文
    /// 暂停引擎内部计时器/动画时钟。
    fn pause(&mut self);

    /// ### English
    /// Resumes the engine's timers.
    ///
    /// ### 中文
    /// 恢复引擎内部计时器。
    fn resume(&mut self);

    /// ### English
    /// Flips the engine's internal paused flag.
    ///
    /// ### 中文
    /// 翻转引擎内部的暂停标记。
    fn toggle(&mut self);

    /// ### English
    /// Feeds one pointer coordinate into the simulation/camera model.
    ///
    /// ### 中文
    /// 向模拟/相机模型输入一个指针坐标。
    fn touch(&mut self, x: f32, y: f32);

    /// ### English
    /// Produces one frame into the currently bound graphics context.
    ///
    /// ### 中文
    /// 向当前绑定的图形上下文输出一帧。
    fn render_frame(&mut self);

    /// ### English
    /// Produces one frame with the current clock reading. Defaults to [`Self::render_frame`].
    ///
    /// ### 中文
    /// 携带当前时钟读数输出一帧。默认转发到 [`Self::render_frame`]。
    fn render_frame_at(&mut self, tick: &FrameTick) {
        let _ = tick;
        self.render_frame();
    }

    /// ### English
    /// A fresh graphics context is bound on the render thread (once per render thread).
    ///
    /// ### 中文
    /// 渲染线程上绑定了新的图形上下文（每个渲染线程一次）。
    fn init(&mut self, size: PhysicalSize<u32>) {
        let _ = size;
    }

    /// ### English
    /// The drawable size changed.
    ///
    /// ### 中文
    /// 可绘制区域尺寸发生变化。
    fn resize(&mut self, size: PhysicalSize<u32>) {
        let _ = size;
    }

    /// ### English
    /// The graphics context is about to be lost; GPU objects created in `init` are invalid
    /// afterwards.
    ///
    /// ### 中文
    /// 图形上下文即将丢失；此后在 `init` 中创建的 GPU 对象都将失效。
    fn deinit(&mut self) {}
}
