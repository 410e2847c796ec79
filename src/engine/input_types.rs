//! ### English
//! Touch input types.
//! Android `MotionEvent` action codes are decoded here so the surface only ever sees a typed
//! action.
//!
//! ### 中文
//! 触摸输入类型。
//! 在此解码 Android `MotionEvent` 动作码，使 surface 只处理类型化的动作。

/// ### English
/// Mask selecting the action bits of a `MotionEvent` action (pointer index bits are dropped).
///
/// ### 中文
/// 选取 `MotionEvent` 动作位的掩码（去掉 pointer index 位）。
pub const ANDROID_ACTION_MASK: i32 = 0xff;
pub const ANDROID_ACTION_DOWN: i32 = 0;
pub const ANDROID_ACTION_UP: i32 = 1;
pub const ANDROID_ACTION_MOVE: i32 = 2;
pub const ANDROID_ACTION_CANCEL: i32 = 3;

/// ### English
/// Decoded touch action delivered by the windowing system.
///
/// ### 中文
/// 窗口系统传入的已解码触摸动作。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchAction {
    Down,
    Move,
    Up,
    Cancel,
    /// ### English
    /// Any other action (pointer down/up, hover, outside...), carrying the masked action code.
    ///
    /// ### 中文
    /// 其它动作（多指按下/抬起、悬停、outside 等），携带掩码后的动作码。
    Other(i32),
}

impl TouchAction {
    /// ### English
    /// Decodes a raw `MotionEvent.getAction()` value.
    ///
    /// ### 中文
    /// 解码原始的 `MotionEvent.getAction()` 值。
    pub fn from_android(action: i32) -> Self {
        match action & ANDROID_ACTION_MASK {
            ANDROID_ACTION_DOWN => Self::Down,
            ANDROID_ACTION_UP => Self::Up,
            ANDROID_ACTION_MOVE => Self::Move,
            ANDROID_ACTION_CANCEL => Self::Cancel,
            other => Self::Other(other),
        }
    }

    /// ### English
    /// Returns the pending-event kind for actions the engine consumes.
    ///
    /// Only `Down` and `Move` feed the engine; `Up` and everything else is ignored by policy.
    ///
    /// ### 中文
    /// 对引擎会消费的动作返回待处理事件类型。
    ///
    /// 只有 `Down` 与 `Move` 会输入引擎；`Up` 及其它动作按策略忽略。
    #[inline]
    pub fn kind(self) -> Option<TouchKind> {
        match self {
            Self::Down => Some(TouchKind::Down),
            Self::Move => Some(TouchKind::Move),
            Self::Up | Self::Cancel | Self::Other(_) => None,
        }
    }
}

/// ### English
/// Kind of a pending input event.
///
/// ### 中文
/// 待处理输入事件的类型。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchKind {
    Down,
    Move,
}

/// ### English
/// One pending input event: produced on the UI-facing thread, consumed at most once by the
/// render thread.
///
/// ### 中文
/// 一个待处理输入事件：在 UI 线程产生，由渲染线程至多消费一次。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    pub x: f32,
    pub y: f32,
    pub kind: TouchKind,
}

/// ### English
/// What the surface did with one touch callback.
///
/// ### 中文
/// surface 对一次触摸回调的处理结果。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchDisposition {
    /// ### English
    /// Enqueued for the render thread.
    ///
    /// ### 中文
    /// 已入队，等待渲染线程处理。
    Queued,
    /// ### English
    /// The action kind is not forwarded (`Up`, `Cancel`, ...).
    ///
    /// ### 中文
    /// 该动作类型不会被转发（`Up`、`Cancel` 等）。
    Ignored,
    /// ### English
    /// Dropped: the surface is not rendering, or the touch queue is full.
    ///
    /// ### 中文
    /// 被丢弃：surface 未在渲染，或触摸队列已满。
    Dropped,
}
