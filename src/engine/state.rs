//! ### English
//! Surface lifecycle state machine.
//!
//! The transition function is pure so callers (and tests) can fold any sequence of lifecycle
//! events and compare the result with what the surface reports.
//!
//! ### 中文
//! Surface 生命周期状态机。
//!
//! 状态转移函数是纯函数，调用方（以及测试）可以对任意生命周期事件序列做 fold，
//! 并与 surface 报告的状态进行比较。

use std::sync::atomic::{AtomicU8, Ordering};

/// ### English
/// Lifecycle state of one render surface.
///
/// ### 中文
/// 单个渲染 surface 的生命周期状态。
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// ### English
    /// Constructed; the engine has never been resumed through this surface.
    ///
    /// ### 中文
    /// 已构造；尚未通过该 surface 恢复过引擎。
    Uninitialized = 0,
    /// ### English
    /// Rendering; touch input is accepted.
    ///
    /// ### 中文
    /// 正在渲染；接收触摸输入。
    Active = 1,
    /// ### English
    /// Paused by the host; no frames are rendered and touch input is dropped.
    ///
    /// ### 中文
    /// 被宿主暂停；不渲染帧，触摸输入被丢弃。
    Suspended = 2,
    /// ### English
    /// Terminal; no further engine commands may be issued.
    ///
    /// ### 中文
    /// 终止状态；不允许再发出任何引擎命令。
    Destroyed = 3,
}

/// ### English
/// Lifecycle requests delivered by the host controller.
///
/// ### 中文
/// 宿主控制器发出的生命周期请求。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Resume,
    Suspend,
    Destroy,
}

impl LifecycleState {
    /// ### English
    /// Returns the state reached after applying `event`.
    ///
    /// Redundant requests (resume while `Active`, suspend while `Suspended` or `Uninitialized`)
    /// leave the state unchanged. `Destroyed` absorbs every event.
    ///
    /// ### 中文
    /// 返回应用 `event` 之后到达的状态。
    ///
    /// 冗余请求（`Active` 时 resume、`Suspended`/`Uninitialized` 时 suspend）不改变状态；
    /// `Destroyed` 吸收所有事件。
    pub fn next(self, event: LifecycleEvent) -> Self {
        use LifecycleEvent as E;
        use LifecycleState as S;

        match (self, event) {
            (S::Destroyed, _) => S::Destroyed,
            (_, E::Destroy) => S::Destroyed,
            (S::Uninitialized | S::Suspended | S::Active, E::Resume) => S::Active,
            (S::Active | S::Suspended, E::Suspend) => S::Suspended,
            (S::Uninitialized, E::Suspend) => S::Uninitialized,
        }
    }

    /// ### English
    /// Folds a sequence of events starting from `self`.
    ///
    /// ### 中文
    /// 从 `self` 出发对事件序列做 fold。
    pub fn fold<I>(self, events: I) -> Self
    where
        I: IntoIterator<Item = LifecycleEvent>,
    {
        events.into_iter().fold(self, Self::next)
    }

    #[inline]
    pub fn is_active(self) -> bool {
        self == Self::Active
    }

    #[inline]
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Uninitialized,
            1 => Self::Active,
            2 => Self::Suspended,
            _ => Self::Destroyed,
        }
    }
}

/// ### English
/// Lifecycle state shared between the UI-facing thread (sole writer) and its readers
/// (touch producers, the render thread).
///
/// ### 中文
/// 在 UI 线程（唯一写入方）与读取方（触摸生产者、渲染线程）之间共享的生命周期状态。
#[derive(Debug)]
pub(crate) struct SharedLifecycle {
    state: AtomicU8,
}

impl SharedLifecycle {
    pub(crate) fn new(state: LifecycleState) -> Self {
        Self {
            state: AtomicU8::new(state as u8),
        }
    }

    #[inline]
    pub(crate) fn load(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    #[inline]
    pub(crate) fn store(&self, state: LifecycleState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use LifecycleEvent::{Destroy, Resume, Suspend};
    use LifecycleState::{Active, Destroyed, Suspended, Uninitialized};

    #[test]
    fn documented_transitions() {
        assert_eq!(Uninitialized.next(Resume), Active);
        assert_eq!(Active.next(Suspend), Suspended);
        assert_eq!(Suspended.next(Resume), Active);
        for state in [Uninitialized, Active, Suspended] {
            assert_eq!(state.next(Destroy), Destroyed);
        }
    }

    #[test]
    fn redundant_requests_are_no_ops() {
        assert_eq!(Active.next(Resume), Active);
        assert_eq!(Suspended.next(Suspend), Suspended);
        assert_eq!(Uninitialized.next(Suspend), Uninitialized);
    }

    #[test]
    fn destroyed_is_terminal() {
        for event in [Resume, Suspend, Destroy] {
            assert_eq!(Destroyed.next(event), Destroyed);
        }
    }

    #[test]
    fn fold_only_depends_on_last_effective_request() {
        assert_eq!(
            Uninitialized.fold([Resume, Resume, Suspend, Suspend, Resume]),
            Active
        );
        assert_eq!(Uninitialized.fold([Suspend, Suspend]), Uninitialized);
        assert_eq!(Uninitialized.fold([Resume, Suspend, Destroy, Resume]), Destroyed);
    }
}
