//! ### English
//! Render surface: owns the lifecycle state, the render thread, and the engine handle.
//!
//! ### 中文
//! 渲染 surface：持有生命周期状态、渲染线程与引擎句柄。

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{self as channel, RecvTimeoutError};
use dpi::PhysicalSize;

use crate::engine::config::{SurfaceConfig, clamp_size};
use crate::engine::error::SurfaceError;
use crate::engine::handle::EngineHandle;
use crate::engine::input_types::{TouchAction, TouchDisposition, TouchEvent};
use crate::engine::state::{LifecycleEvent, LifecycleState, SharedLifecycle};

use super::command::Command;
use super::queue::CommandQueue;
use super::render_thread::{RenderThreadInit, Teardown, ThreadControl, run_render_thread};

/// ### English
/// How often a blocked `suspend()` checks that the render thread is still alive.
///
/// ### 中文
/// 阻塞中的 `suspend()` 检查渲染线程是否存活的间隔。
const PAUSE_ACK_POLL: Duration = Duration::from_millis(10);

/// ### English
/// Live render thread plus its teardown flag.
///
/// ### 中文
/// 存活的渲染线程及其拆除标记。
struct RenderThreadHandle {
    join: thread::JoinHandle<EngineHandle>,
    control: Arc<ThreadControl>,
}

/// ### English
/// GPU-backed drawing surface and single entry point for every command into the native engine.
///
/// Lifecycle methods take `&mut self` and are meant to be called from the UI-facing thread.
/// All engine calls run on the dedicated render thread.
///
/// ### 中文
/// GPU 支持的绘制 surface，也是所有进入原生引擎的命令的唯一入口。
///
/// 生命周期方法接收 `&mut self`，应在 UI 线程调用；所有引擎调用都在独立渲染线程执行。
pub struct RenderSurface {
    config: SurfaceConfig,
    lifecycle: Arc<SharedLifecycle>,
    /// ### English
    /// Command queue into the render thread (outlives individual render threads).
    ///
    /// ### 中文
    /// 发往渲染线程的命令队列（生命周期长于单个渲染线程）。
    queue: Arc<CommandQueue>,
    /// ### English
    /// Engine handle parked here while no render thread owns it.
    ///
    /// ### 中文
    /// 没有渲染线程持有时，引擎句柄暂存于此。
    engine: Option<EngineHandle>,
    thread: Option<RenderThreadHandle>,
    /// ### English
    /// Latest drawable size reported by the window system.
    ///
    /// ### 中文
    /// 窗口系统最近报告的可绘制区域尺寸。
    size: PhysicalSize<u32>,
    /// ### English
    /// A window surface exists (between `surface_created` and `surface_destroyed`). Render threads
    /// only run while this is set.
    ///
    /// ### 中文
    /// 窗口 surface 存在（位于 `surface_created` 与 `surface_destroyed` 之间）。
    /// 渲染线程只在此标记为真时运行。
    has_surface: bool,
}

impl RenderSurface {
    /// ### English
    /// Creates a surface in the `Uninitialized` state. No thread is started yet.
    ///
    /// ### 中文
    /// 创建处于 `Uninitialized` 状态的 surface，此时不会启动线程。
    pub fn new(engine: EngineHandle, config: SurfaceConfig) -> Self {
        let config = config.normalized();
        Self {
            lifecycle: Arc::new(SharedLifecycle::new(LifecycleState::Uninitialized)),
            queue: Arc::new(CommandQueue::new(config.touch_queue_capacity)),
            engine: Some(engine),
            thread: None,
            size: config.initial_size,
            has_surface: false,
            config,
        }
    }

    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.lifecycle.load()
    }

    #[inline]
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// ### English
    /// Returns whether a render thread is currently alive.
    ///
    /// ### 中文
    /// 返回当前是否有存活的渲染线程。
    pub fn has_render_thread(&self) -> bool {
        self.thread
            .as_ref()
            .is_some_and(|thread| !thread.join.is_finished())
    }

    /// ### English
    /// `Uninitialized`/`Suspended` → `Active`.
    ///
    /// (Re)starts the render thread if a window surface exists, then forwards `resume` and starts
    /// frame scheduling. Without a window surface only the state changes; the render thread started
    /// by the next `surface_created()` resumes the engine. No-op while already `Active`.
    ///
    /// ### 中文
    /// `Uninitialized`/`Suspended` → `Active`。
    ///
    /// 若窗口 surface 存在，必要时（重新）启动渲染线程，随后转发 `resume` 并开始调度帧。
    /// 没有窗口 surface 时只改变状态；由下一次 `surface_created()` 启动的渲染线程恢复引擎。
    /// 已处于 `Active` 时为空操作。
    pub fn resume(&mut self) -> Result<(), SurfaceError> {
        let state = self.checked_state()?;
        match state {
            LifecycleState::Active => {
                log::debug!("resume ignored: surface already active");
                return Ok(());
            }
            LifecycleState::Uninitialized | LifecycleState::Suspended => {}
            LifecycleState::Destroyed => return Err(SurfaceError::Destroyed),
        }

        if self.has_surface {
            self.ensure_render_thread(false)?;
        }
        self.lifecycle.store(state.next(LifecycleEvent::Resume));
        if self.has_render_thread() {
            self.queue.push(Command::Resume);
        } else {
            log::debug!("resume without window surface: engine resume deferred to surface_created");
        }
        log::debug!("surface active");
        Ok(())
    }

    /// ### English
    /// `Active` → `Suspended`.
    ///
    /// Blocks until the render thread has finished any in-flight frame and paused the engine.
    /// No-op while `Suspended` or `Uninitialized`.
    ///
    /// ### 中文
    /// `Active` → `Suspended`。
    ///
    /// 阻塞直到渲染线程完成正在进行的帧并暂停引擎。处于 `Suspended` 或 `Uninitialized` 时为空操作。
    pub fn suspend(&mut self) -> Result<(), SurfaceError> {
        let state = self.checked_state()?;
        match state {
            LifecycleState::Active => {}
            LifecycleState::Uninitialized | LifecycleState::Suspended => {
                log::debug!("suspend ignored: surface not active");
                return Ok(());
            }
            LifecycleState::Destroyed => return Err(SurfaceError::Destroyed),
        }

        self.lifecycle.store(state.next(LifecycleEvent::Suspend));

        if self.has_render_thread() {
            let (ack_tx, ack_rx) = channel::bounded(1);
            if self.queue.push(Command::Pause { ack: ack_tx }) {
                self.await_pause(&ack_rx);
            }
        } else {
            log::debug!("suspend without render thread: engine pause deferred to next thread");
        }

        log::debug!("surface suspended");
        Ok(())
    }

    /// ### English
    /// Forwards one touch callback. Never blocks.
    ///
    /// Only `Down` and `Move` are forwarded. Touches are dropped while the surface is not
    /// `Active`, while no render thread is alive, or when the touch queue is full.
    ///
    /// ### 中文
    /// 转发一次触摸回调，永不阻塞。
    ///
    /// 只转发 `Down` 与 `Move`。surface 非 `Active`、没有存活的渲染线程或触摸队列已满时丢弃。
    pub fn on_touch(
        &self,
        x: f32,
        y: f32,
        action: TouchAction,
    ) -> Result<TouchDisposition, SurfaceError> {
        let state = self.checked_state()?;
        let Some(kind) = action.kind() else {
            return Ok(TouchDisposition::Ignored);
        };
        if !state.is_active() || !self.has_render_thread() {
            return Ok(TouchDisposition::Dropped);
        }

        if self.queue.try_push_touch(TouchEvent { x, y, kind }) {
            Ok(TouchDisposition::Queued)
        } else {
            log::warn!(
                "touch queue full ({} pending); dropping touch ({x}, {y})",
                self.queue.pending_touches()
            );
            Ok(TouchDisposition::Dropped)
        }
    }

    /// ### English
    /// Forwards the engine's toggle-pause command.
    ///
    /// ### 中文
    /// 转发引擎的 toggle-pause 命令。
    pub fn toggle(&self) -> Result<(), SurfaceError> {
        self.checked_state()?;
        self.queue.push(Command::Toggle);
        Ok(())
    }

    /// ### English
    /// Requests one frame (used by on-demand render mode).
    ///
    /// ### 中文
    /// 请求渲染一帧（用于按需渲染模式）。
    pub fn request_render(&self) -> Result<(), SurfaceError> {
        self.checked_state()?;
        self.queue.push(Command::RequestRender);
        Ok(())
    }

    /// ### English
    /// The window system created a drawable: starts the render thread if none is alive.
    ///
    /// The new thread calls `init` with this size and resumes the engine if the surface is
    /// already `Active` (the usual order on Android is `onResume` before `surfaceCreated`).
    ///
    /// ### 中文
    /// 窗口系统创建了可绘制区域：若没有存活的渲染线程则启动一个。
    ///
    /// 新线程以该尺寸调用 `init`，若 surface 已处于 `Active` 则恢复引擎
    /// （Android 上通常先 `onResume` 再 `surfaceCreated`）。
    pub fn surface_created(&mut self, size: PhysicalSize<u32>) -> Result<(), SurfaceError> {
        let state = self.checked_state()?;
        let size = clamp_size(size);
        self.has_surface = true;

        if self.has_render_thread() {
            if size != self.size {
                self.size = size;
                self.queue.push(Command::Resize(size));
            }
            return Ok(());
        }

        self.size = size;
        self.ensure_render_thread(state.is_active())
    }

    /// ### English
    /// The drawable size changed.
    ///
    /// ### 中文
    /// 可绘制区域尺寸发生变化。
    pub fn surface_changed(&mut self, size: PhysicalSize<u32>) -> Result<(), SurfaceError> {
        self.checked_state()?;
        let size = clamp_size(size);
        self.size = size;
        if self.has_render_thread() {
            self.queue.push(Command::Resize(size));
        }
        Ok(())
    }

    /// ### English
    /// The window surface (and its graphics context) went away.
    ///
    /// Tears down the render thread, cancelling queued commands. The lifecycle state is kept; the
    /// next `surface_created()` starts a fresh render thread that re-runs `init`.
    ///
    /// ### 中文
    /// 窗口 surface（及其图形上下文）已消失。
    ///
    /// 拆除渲染线程并取消排队命令。生命周期状态保持不变；
    /// 下一次 `surface_created()` 会启动新的渲染线程并重新调用 `init`。
    pub fn surface_destroyed(&mut self) -> Result<(), SurfaceError> {
        self.checked_state()?;
        self.has_surface = false;
        self.teardown(Teardown::ContextLost);
        Ok(())
    }

    /// ### English
    /// Any state → `Destroyed` (terminal).
    ///
    /// Tears down the render thread and discards queued touches and commands. Every later call
    /// returns [`SurfaceError::Destroyed`].
    ///
    /// ### 中文
    /// 任意状态 → `Destroyed`（终止状态）。
    ///
    /// 拆除渲染线程并丢弃排队的触摸与命令。之后的所有调用都返回 [`SurfaceError::Destroyed`]。
    pub fn destroy(&mut self) -> Result<(), SurfaceError> {
        let state = self.checked_state()?;
        self.lifecycle.store(state.next(LifecycleEvent::Destroy));
        self.teardown(Teardown::Destroyed);
        self.queue.close();
        log::debug!("surface destroyed");
        Ok(())
    }

    fn checked_state(&self) -> Result<LifecycleState, SurfaceError> {
        match self.lifecycle.load() {
            LifecycleState::Destroyed => Err(SurfaceError::Destroyed),
            state => Ok(state),
        }
    }

    /// ### English
    /// Spawns a render thread unless one is alive; reaps a thread that exited on its own.
    ///
    /// ### 中文
    /// 若没有存活的渲染线程则创建一个；回收自行退出的线程。
    fn ensure_render_thread(&mut self, engine_should_run: bool) -> Result<(), SurfaceError> {
        if self.has_render_thread() {
            return Ok(());
        }
        if let Some(finished) = self.thread.take() {
            self.reap(finished);
        }

        let Some(engine) = self.engine.take() else {
            log::error!("cannot start render thread: engine handle lost");
            return Err(SurfaceError::EngineLost);
        };

        let control = Arc::new(ThreadControl::default());
        let init = RenderThreadInit {
            engine,
            queue: self.queue.clone(),
            control: control.clone(),
            render_mode: self.config.render_mode,
            coalesce_touch_moves: self.config.coalesce_touch_moves,
            size: self.size,
            engine_should_run,
        };

        let join = thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn(move || run_render_thread(init))
            .map_err(|err| {
                log::error!("failed to spawn render thread: {err}");
                SurfaceError::Spawn(err)
            })?;

        self.thread = Some(RenderThreadHandle { join, control });
        Ok(())
    }

    /// ### English
    /// Waits for the render thread to acknowledge `Pause`.
    ///
    /// The queue outlives the thread, so a thread that dies with `Pause` still queued never drops
    /// the acknowledgement sender. The wait therefore also ends when the thread has finished; the
    /// dead thread is reaped and its unexecuted commands discarded.
    ///
    /// ### 中文
    /// 等待渲染线程确认 `Pause`。
    ///
    /// 队列的生命周期长于线程，线程在 `Pause` 仍排队时死亡不会 drop 确认发送端。
    /// 因此线程结束时等待同样会终止；随后回收死亡线程并丢弃其未执行的命令。
    fn await_pause(&mut self, ack_rx: &channel::Receiver<()>) {
        loop {
            match ack_rx.recv_timeout(PAUSE_ACK_POLL) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
                Err(RecvTimeoutError::Timeout) => {
                    if self.has_render_thread() {
                        continue;
                    }
                    log::error!("render thread exited before acknowledging pause");
                    if let Some(finished) = self.thread.take() {
                        self.reap(finished);
                    }
                    let discarded = self.queue.discard_pending();
                    log::debug!("cancelled {discarded} queued render commands (thread exited)");
                    return;
                }
            }
        }
    }

    fn teardown(&mut self, reason: Teardown) {
        if let Some(thread) = self.thread.take() {
            thread.control.request(reason);
            self.queue.wake();
            self.reap(thread);
        }

        let discarded = self.queue.discard_pending();
        if discarded > 0 {
            log::debug!("cancelled {discarded} queued render commands ({reason:?})");
        }
    }

    /// ### English
    /// Joins a render thread and takes its engine handle back.
    ///
    /// ### 中文
    /// join 渲染线程并取回其引擎句柄。
    fn reap(&mut self, thread: RenderThreadHandle) {
        match thread.join.join() {
            Ok(engine) => self.engine = Some(engine),
            Err(_) => log::error!("render thread panicked; engine handle lost"),
        }
    }
}

impl Drop for RenderSurface {
    /// ### English
    /// Ensures the render thread is torn down when the surface is dropped.
    ///
    /// ### 中文
    /// 确保 surface drop 时拆除渲染线程。
    fn drop(&mut self) {
        if self.lifecycle.load() != LifecycleState::Destroyed {
            let _ = self.destroy();
        }
    }
}
