//! ### English
//! Command queue feeding the render thread.
//!
//! ### 中文
//! 向渲染线程输送命令的队列。
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crossbeam_channel as channel;

use crate::engine::input_types::TouchEvent;

use super::command::Command;

/// ### English
/// Unbounded FIFO of render-thread commands with a bounded budget for touch events.
///
/// The queue outlives individual render threads: a restarted thread keeps reading from the same
/// channel, and teardown discards whatever the old thread did not execute.
///
/// ### 中文
/// 渲染线程命令的无界 FIFO，其中触摸事件有单独的上限。
///
/// 队列的生命周期长于单个渲染线程：重启后的线程继续从同一个 channel 读取，
/// 拆除时会丢弃旧线程尚未执行的命令。
pub(super) struct CommandQueue {
    tx: channel::Sender<Command>,
    rx: channel::Receiver<Command>,
    /// ### English
    /// Touch events pushed but not yet taken by the render thread (or discarded).
    ///
    /// ### 中文
    /// 已 push 但尚未被渲染线程取走（或丢弃）的触摸事件数。
    pending_touches: AtomicUsize,
    touch_capacity: usize,
    /// ### English
    /// Close flag used to reject new commands after destroy.
    ///
    /// ### 中文
    /// 关闭标记：destroy 之后拒绝新命令。
    closed: AtomicBool,
}

impl CommandQueue {
    pub(super) fn new(touch_capacity: usize) -> Self {
        let (tx, rx) = channel::unbounded();
        Self {
            tx,
            rx,
            pending_touches: AtomicUsize::new(0),
            touch_capacity: touch_capacity.max(1),
            closed: AtomicBool::new(false),
        }
    }

    /// ### English
    /// Receiver end, cloned into each render thread.
    ///
    /// ### 中文
    /// 接收端，克隆给每个渲染线程。
    pub(super) fn receiver(&self) -> channel::Receiver<Command> {
        self.rx.clone()
    }

    /// ### English
    /// Tries to push one command; returns `false` if the queue is closed.
    ///
    /// ### 中文
    /// 尝试 push 一个命令；若队列已关闭则返回 `false`。
    pub(super) fn push(&self, command: Command) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }
        self.tx.send(command).is_ok()
    }

    /// ### English
    /// Tries to push one touch event without blocking.
    ///
    /// Returns `false` if the queue is closed or `touch_capacity` events are already waiting.
    ///
    /// ### 中文
    /// 非阻塞地尝试 push 一个触摸事件。
    ///
    /// 若队列已关闭或已有 `touch_capacity` 个事件在等待，返回 `false`。
    pub(super) fn try_push_touch(&self, event: TouchEvent) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }
        if self.pending_touches.fetch_add(1, Ordering::AcqRel) >= self.touch_capacity {
            self.pending_touches.fetch_sub(1, Ordering::AcqRel);
            return false;
        }
        if self.tx.send(Command::Touch(event)).is_err() {
            self.pending_touches.fetch_sub(1, Ordering::AcqRel);
            return false;
        }
        true
    }

    /// ### English
    /// Must be called once for every `Command::Touch` taken out of the channel.
    ///
    /// ### 中文
    /// 每从 channel 取出一个 `Command::Touch`，必须调用一次。
    #[inline]
    pub(super) fn touch_taken(&self) {
        self.pending_touches.fetch_sub(1, Ordering::AcqRel);
    }

    #[inline]
    pub(super) fn pending_touches(&self) -> usize {
        self.pending_touches.load(Ordering::Acquire)
    }

    /// ### English
    /// Sends `Shutdown` even if the queue is closed, so a blocked render thread wakes up.
    ///
    /// ### 中文
    /// 即使队列已关闭也发送 `Shutdown`，以唤醒阻塞中的渲染线程。
    pub(super) fn wake(&self) {
        let _ = self.tx.send(Command::Shutdown);
    }

    /// ### English
    /// Discards every queued command and returns how many were dropped.
    ///
    /// Dropping a `Pause` drops its acknowledgement sender, which releases any waiter.
    ///
    /// ### 中文
    /// 丢弃所有排队命令并返回丢弃的数量。
    ///
    /// 丢弃 `Pause` 会同时 drop 其确认发送端，从而释放等待方。
    pub(super) fn discard_pending(&self) -> usize {
        let mut discarded = 0;
        while let Ok(command) = self.rx.try_recv() {
            if command.is_touch() {
                self.touch_taken();
            }
            if !matches!(command, Command::Shutdown) {
                discarded += 1;
            }
        }
        discarded
    }

    /// ### English
    /// Closes the queue and discards remaining commands.
    ///
    /// ### 中文
    /// 关闭队列并丢弃剩余命令。
    pub(super) fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.discard_pending();
    }
}
