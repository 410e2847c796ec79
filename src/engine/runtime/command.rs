//! ### English
//! Internal command protocol between the UI-facing thread and the render thread.
//!
//! Lifecycle requests and touch events share one FIFO, so the render thread observes them in the
//! exact order the host issued them.
//!
//! ### 中文
//! UI 线程与渲染线程之间的内部命令协议。
//!
//! 生命周期请求与触摸事件共用同一个 FIFO，渲染线程看到的顺序与宿主发出的顺序完全一致。

use crossbeam_channel as channel;
use dpi::PhysicalSize;

use crate::engine::input_types::{TouchEvent, TouchKind};

/// ### English
/// Commands executed by the render thread in FIFO order.
///
/// ### 中文
/// 渲染线程按 FIFO 顺序执行的命令。
pub(super) enum Command {
    /// ### English
    /// Resume the engine and start scheduling frames.
    ///
    /// ### 中文
    /// 恢复引擎并开始调度帧。
    Resume,
    /// ### English
    /// Pause the engine, then acknowledge. Because the render thread executes commands between
    /// frames, receiving this command means no frame is in flight.
    ///
    /// ### 中文
    /// 暂停引擎后回包确认。渲染线程在帧与帧之间执行命令，
    /// 因此收到该命令即意味着没有正在进行的帧。
    Pause {
        /// ### English
        /// One-shot acknowledgement channel for the blocked `suspend()` caller.
        ///
        /// ### 中文
        /// 阻塞中的 `suspend()` 调用方使用的一次性确认 channel。
        ack: channel::Sender<()>,
    },
    Toggle,
    /// ### English
    /// One pending touch event (bounded separately, see `CommandQueue::try_push_touch`).
    ///
    /// ### 中文
    /// 一个待处理触摸事件（单独限额，见 `CommandQueue::try_push_touch`）。
    Touch(TouchEvent),
    /// ### English
    /// Drawable size changed (coalesced per batch; latest wins).
    ///
    /// ### 中文
    /// 可绘制区域尺寸变化（每批合并；以最新为准）。
    Resize(PhysicalSize<u32>),
    RequestRender,
    /// ### English
    /// Wakes the render thread so it observes its teardown flag.
    ///
    /// ### 中文
    /// 唤醒渲染线程，使其观察到拆除标记。
    Shutdown,
}

impl Command {
    #[inline]
    pub(super) fn is_touch(&self) -> bool {
        matches!(self, Self::Touch(_))
    }

    #[inline]
    pub(super) fn is_touch_move(&self) -> bool {
        matches!(
            self,
            Self::Touch(TouchEvent {
                kind: TouchKind::Move,
                ..
            })
        )
    }

    #[inline]
    pub(super) fn is_resize(&self) -> bool {
        matches!(self, Self::Resize(_))
    }
}
