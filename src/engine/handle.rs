//! ### English
//! Process-wide engine handle.
//!
//! The native engine keeps its state (geometry, camera, timers) in process globals, so only one
//! handle may exist at a time. The handle is injected into the render surface, moved onto each
//! render thread it spawns, and handed back when that thread is torn down.
//!
//! ### 中文
//! 进程级引擎句柄。
//!
//! 原生引擎把状态（几何、相机、计时器）保存在进程全局变量中，因此同一时刻只能存在一个句柄。
//! 句柄被注入渲染 surface，随其创建的每个渲染线程移动过去，并在线程拆除时交还。

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use dpi::PhysicalSize;

use super::boundary::NativeEngine;
use super::clock::{FrameClock, FrameTick};
use super::error::SurfaceError;

static ENGINE_HANDLE_CLAIMED: AtomicBool = AtomicBool::new(false);

/// ### English
/// Exclusive owner of the native engine for this process.
///
/// Also tracks whether the engine is currently running (resumed and not paused) so that
/// redundant pause/resume commands never reach the boundary twice in a row.
///
/// ### 中文
/// 本进程原生引擎的独占持有者。
///
/// 同时记录引擎当前是否处于运行态（已 resume 且未 pause），
/// 保证冗余的 pause/resume 命令不会连续两次到达边界。
pub struct EngineHandle {
    engine: Box<dyn NativeEngine>,
    running: bool,
    clock: FrameClock,
    frames_rendered: u64,
}

impl EngineHandle {
    /// ### English
    /// Claims the process-wide engine slot.
    ///
    /// Fails with [`SurfaceError::EngineHandleTaken`] while another handle is alive; the slot is
    /// released when the handle is dropped.
    ///
    /// ### 中文
    /// 占用进程级引擎槽位。
    ///
    /// 若另一个句柄仍存活，则返回 [`SurfaceError::EngineHandleTaken`]；句柄 drop 时释放槽位。
    pub fn acquire<E>(engine: E) -> Result<Self, SurfaceError>
    where
        E: NativeEngine + 'static,
    {
        if ENGINE_HANDLE_CLAIMED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SurfaceError::EngineHandleTaken);
        }

        Ok(Self {
            engine: Box::new(engine),
            running: false,
            clock: FrameClock::default(),
            frames_rendered: 0,
        })
    }

    /// ### English
    /// Returns whether the engine is resumed (frames may be rendered).
    ///
    /// ### 中文
    /// 返回引擎是否处于 resume 状态（可以渲染帧）。
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Returns `true` if the boundary was called.
    pub(crate) fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.engine.pause();
        self.clock.pause(Instant::now());
        self.running = false;
        true
    }

    /// Returns `true` if the boundary was called.
    pub(crate) fn resume(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.engine.resume();
        self.clock.resume(Instant::now());
        self.running = true;
        true
    }

    pub(crate) fn toggle(&mut self) {
        self.engine.toggle();
    }

    pub(crate) fn touch(&mut self, x: f32, y: f32) {
        self.engine.touch(x, y);
    }

    pub(crate) fn init(&mut self, size: PhysicalSize<u32>) {
        self.engine.init(size);
    }

    pub(crate) fn resize(&mut self, size: PhysicalSize<u32>) {
        self.engine.resize(size);
    }

    pub(crate) fn deinit(&mut self) {
        self.engine.deinit();
    }

    pub(crate) fn render_frame(&mut self, size: PhysicalSize<u32>) {
        let tick = FrameTick {
            tick_ms: self.clock.tick_ms(Instant::now()),
            frame_index: self.frames_rendered,
            size,
        };
        self.engine.render_frame_at(&tick);
        self.frames_rendered += 1;
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        ENGINE_HANDLE_CLAIMED.store(false, Ordering::Release);
    }
}

/// ### English
/// Serializes tests that claim the process-wide engine handle.
///
/// ### 中文
/// 串行化需要占用进程级引擎句柄的测试。
#[cfg(test)]
pub(crate) fn serial_guard() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::Mutex;

    static SERIAL: Mutex<()> = Mutex::new(());
    SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        pauses: u32,
        resumes: u32,
    }

    impl NativeEngine for Counting {
        fn pause(&mut self) {
            self.pauses += 1;
        }
        fn resume(&mut self) {
            self.resumes += 1;
        }
        fn toggle(&mut self) {}
        fn touch(&mut self, _x: f32, _y: f32) {}
        fn render_frame(&mut self) {}
    }

    #[test]
    fn second_handle_is_rejected_until_first_is_dropped() {
        let _serial = serial_guard();

        let first = EngineHandle::acquire(Counting::default()).expect("first handle");
        assert!(matches!(
            EngineHandle::acquire(Counting::default()),
            Err(SurfaceError::EngineHandleTaken)
        ));

        drop(first);
        let again = EngineHandle::acquire(Counting::default());
        assert!(again.is_ok());
    }

    #[test]
    fn pause_and_resume_are_edge_triggered() {
        let _serial = serial_guard();

        let mut handle = EngineHandle::acquire(Counting::default()).expect("handle");
        assert!(!handle.pause());
        assert!(handle.resume());
        assert!(!handle.resume());
        assert!(handle.is_running());
        assert!(handle.pause());
        assert!(!handle.pause());
        assert!(!handle.is_running());
    }

    #[test]
    fn frames_are_counted() {
        let _serial = serial_guard();

        let mut handle = EngineHandle::acquire(Counting::default()).expect("handle");
        handle.resume();
        handle.render_frame(PhysicalSize::new(4, 4));
        handle.render_frame(PhysicalSize::new(4, 4));
        assert_eq!(handle.frames_rendered(), 2);
    }
}
