//! ### English
//! Dedicated render thread: owns the graphics context and issues every native engine call.
//!
//! ### 中文
//! 独立渲染线程：持有图形上下文，并发出所有原生引擎调用。

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{self as channel, RecvTimeoutError};
use dpi::PhysicalSize;

use crate::engine::config::RenderMode;
use crate::engine::handle::EngineHandle;
use crate::engine::input_types::{TouchEvent, TouchKind};

use super::command::Command;
use super::queue::CommandQueue;

/// ### English
/// Why a render thread is being torn down.
///
/// ### 中文
/// 渲染线程被拆除的原因。
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Teardown {
    /// ### English
    /// The window surface went away; the engine is told via `deinit` before the thread exits.
    ///
    /// ### 中文
    /// 窗口 surface 消失；线程退出前通过 `deinit` 通知引擎。
    ContextLost = 1,
    /// ### English
    /// The render surface was destroyed; no further engine call is made.
    ///
    /// ### 中文
    /// 渲染 surface 已销毁；不再发出任何引擎调用。
    Destroyed = 2,
}

/// ### English
/// Teardown flag shared between the owning surface and one render thread.
///
/// ### 中文
/// 所属 surface 与单个渲染线程之间共享的拆除标记。
#[derive(Debug, Default)]
pub(super) struct ThreadControl {
    teardown: AtomicU8,
}

impl ThreadControl {
    pub(super) fn request(&self, reason: Teardown) {
        let _ = self.teardown.compare_exchange(
            0,
            reason as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    #[inline]
    pub(super) fn requested(&self) -> Option<Teardown> {
        match self.teardown.load(Ordering::Acquire) {
            0 => None,
            1 => Some(Teardown::ContextLost),
            _ => Some(Teardown::Destroyed),
        }
    }
}

pub(super) struct RenderThreadInit {
    pub engine: EngineHandle,
    pub queue: Arc<CommandQueue>,
    pub control: Arc<ThreadControl>,
    pub render_mode: RenderMode,
    pub coalesce_touch_moves: bool,
    pub size: PhysicalSize<u32>,
    /// ### English
    /// Whether the surface was `Active` when this thread was spawned; used to reconcile an engine
    /// whose pause/resume was cancelled by an earlier teardown.
    ///
    /// ### 中文
    /// 创建该线程时 surface 是否为 `Active`；用于校正因先前拆除而被取消 pause/resume 的引擎。
    pub engine_should_run: bool,
}

enum Flow {
    Continue,
    Exit,
}

struct RenderThread {
    engine: EngineHandle,
    queue: Arc<CommandQueue>,
    control: Arc<ThreadControl>,
    frame_interval: Option<Duration>,
    coalesce_touch_moves: bool,
    size: PhysicalSize<u32>,
    /// ### English
    /// A frame was requested (resume, resize, `request_render`) and not yet rendered.
    ///
    /// ### 中文
    /// 已请求一帧（resume、resize、`request_render`）但尚未渲染。
    dirty: bool,
    next_frame: Instant,
}

/// ### English
/// Render thread entry function.
///
/// Runs until its teardown flag is raised, then hands the engine handle back to the caller of
/// `JoinHandle::join`.
///
/// ### 中文
/// 渲染线程入口函数。
///
/// 运行到拆除标记被置位为止，然后把引擎句柄交还给 `JoinHandle::join` 的调用方。
pub(super) fn run_render_thread(init: RenderThreadInit) -> EngineHandle {
    let RenderThreadInit {
        engine,
        queue,
        control,
        render_mode,
        coalesce_touch_moves,
        size,
        engine_should_run,
    } = init;

    let commands = queue.receiver();
    let mut thread = RenderThread {
        engine,
        queue,
        control,
        frame_interval: render_mode.frame_interval(),
        coalesce_touch_moves,
        size,
        dirty: false,
        next_frame: Instant::now(),
    };

    thread.run(&commands, engine_should_run);
    thread.engine
}

impl RenderThread {
    fn run(&mut self, commands: &channel::Receiver<Command>, engine_should_run: bool) {
        log::debug!(
            "render thread started ({}x{})",
            self.size.width,
            self.size.height
        );

        self.engine.init(self.size);
        self.reconcile(engine_should_run);
        if self.engine.is_running() {
            self.request_frame();
        }

        let mut batch: Vec<Command> = Vec::with_capacity(64);
        loop {
            /*
            ### English
            1) Wait for the next command, or until the next frame is due.

            ### 中文
            1) 等待下一条命令，或直到下一帧到期。
            */
            let first = match self.frame_deadline() {
                Some(deadline) => match commands.recv_deadline(deadline) {
                    Ok(command) => Some(command),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                },
                None => match commands.recv() {
                    Ok(command) => Some(command),
                    Err(_) => break,
                },
            };

            if self.control.requested().is_some() {
                if let Some(command) = first {
                    self.forget(command);
                }
                break;
            }

            /*
            ### English
            2) Drain everything queued so far in one batch (FIFO).

            ### 中文
            2) 一次性按 FIFO drain 目前已排队的所有命令。
            */
            if let Some(first) = first {
                batch.push(first);
                batch.extend(commands.try_iter());
                if let Flow::Exit = self.execute_batch(&mut batch) {
                    break;
                }
            }

            /*
            ### English
            3) Render one frame if due. Commands are only executed between frames.

            ### 中文
            3) 若到期则渲染一帧。命令只在帧与帧之间执行。
            */
            if self.control.requested().is_some() {
                break;
            }
            if self.frame_due(Instant::now()) {
                self.render();
            }
        }

        if self.control.requested() == Some(Teardown::ContextLost) {
            self.engine.deinit();
        }
        log::debug!(
            "render thread stopped after {} frames",
            self.engine.frames_rendered()
        );
    }

    fn reconcile(&mut self, engine_should_run: bool) {
        match (engine_should_run, self.engine.is_running()) {
            (true, false) => {
                log::debug!("resuming engine left paused by a cancelled command");
                self.engine.resume();
            }
            (false, true) => {
                log::debug!("pausing engine left running by a cancelled command");
                self.engine.pause();
            }
            _ => {}
        }
    }

    fn execute_batch(&mut self, batch: &mut Vec<Command>) -> Flow {
        let last_resize = batch.iter().rposition(Command::is_resize);
        let mut commands = batch.drain(..).enumerate().peekable();

        while let Some((index, command)) = commands.next() {
            if self.control.requested().is_some() {
                self.forget(command);
                for (_, rest) in commands {
                    self.forget(rest);
                }
                return Flow::Exit;
            }

            match command {
                Command::Resume => {
                    if self.engine.resume() {
                        log::debug!("engine resumed");
                    }
                    self.request_frame();
                }
                Command::Pause { ack } => {
                    if self.engine.pause() {
                        log::debug!("engine paused");
                    }
                    let _ = ack.send(());
                }
                Command::Toggle => self.engine.toggle(),
                Command::Touch(event) => {
                    self.queue.touch_taken();
                    let superseded = self.coalesce_touch_moves
                        && event.kind == TouchKind::Move
                        && commands
                            .peek()
                            .is_some_and(|(_, next)| next.is_touch_move());
                    if !superseded {
                        self.touch(event);
                    }
                }
                Command::Resize(size) => {
                    if last_resize == Some(index) {
                        self.resize(size);
                    }
                }
                Command::RequestRender => self.dirty = true,
                Command::Shutdown => {}
            }
        }

        Flow::Continue
    }

    /// Drops a command without executing it.
    fn forget(&self, command: Command) {
        if command.is_touch() {
            self.queue.touch_taken();
        }
    }

    fn touch(&mut self, event: TouchEvent) {
        if self.engine.is_running() {
            self.engine.touch(event.x, event.y);
        } else {
            log::trace!("dropping touch ({}, {}) while paused", event.x, event.y);
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size == self.size {
            return;
        }
        log::debug!("surface resized to {}x{}", size.width, size.height);
        self.size = size;
        self.engine.resize(size);
        self.request_frame();
    }

    #[inline]
    fn request_frame(&mut self) {
        self.dirty = true;
        self.next_frame = Instant::now();
    }

    fn frame_deadline(&self) -> Option<Instant> {
        if !self.engine.is_running() {
            return None;
        }
        match self.frame_interval {
            Some(_) => Some(self.next_frame),
            None if self.dirty => Some(Instant::now()),
            None => None,
        }
    }

    fn frame_due(&self, now: Instant) -> bool {
        if !self.engine.is_running() {
            return false;
        }
        match self.frame_interval {
            Some(_) => now >= self.next_frame,
            None => self.dirty,
        }
    }

    fn render(&mut self) {
        log::trace!("rendering frame {}", self.engine.frames_rendered());
        self.engine.render_frame(self.size);
        self.dirty = false;

        if let Some(interval) = self.frame_interval {
            let now = Instant::now();
            let next = self.next_frame + interval;
            self.next_frame = if next < now { now } else { next };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_teardown_reason_wins() {
        let control = ThreadControl::default();
        assert_eq!(control.requested(), None);

        control.request(Teardown::ContextLost);
        control.request(Teardown::Destroyed);
        assert_eq!(control.requested(), Some(Teardown::ContextLost));
    }
}
