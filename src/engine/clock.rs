//! ### English
//! Animation clock handed to the engine with every frame.
//!
//! The tick only advances while the engine is running; time spent paused is accumulated into
//! an offset and subtracted, so the animation resumes where it stopped.
//!
//! ### 中文
//! 每帧传给引擎的动画时钟。
//!
//! tick 只在引擎运行时前进；暂停期间的时间累加为偏移量并被扣除，
//! 因此动画会从停下的位置继续。

use std::time::{Duration, Instant};

use dpi::PhysicalSize;

/// ### English
/// Per-frame clock reading passed to `NativeEngine::render_frame_at`.
///
/// ### 中文
/// 传给 `NativeEngine::render_frame_at` 的每帧时钟读数。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTick {
    /// ### English
    /// Animation time in milliseconds (excludes paused time).
    ///
    /// ### 中文
    /// 动画时间（毫秒，不含暂停时间）。
    pub tick_ms: u64,
    /// ### English
    /// Number of frames rendered before this one by the same engine handle.
    ///
    /// ### 中文
    /// 同一引擎句柄在此之前已渲染的帧数。
    pub frame_index: u64,
    /// ### English
    /// Drawable size in physical pixels.
    ///
    /// ### 中文
    /// 可绘制区域尺寸（物理像素）。
    pub size: PhysicalSize<u32>,
}

#[derive(Debug, Default)]
pub(crate) struct FrameClock {
    started: Option<Instant>,
    paused_at: Option<Instant>,
    paused_total: Duration,
}

impl FrameClock {
    pub(crate) fn resume(&mut self, now: Instant) {
        match (self.started, self.paused_at.take()) {
            (None, _) => self.started = Some(now),
            (Some(_), Some(paused_at)) => {
                self.paused_total += now.saturating_duration_since(paused_at);
            }
            (Some(_), None) => {}
        }
    }

    pub(crate) fn pause(&mut self, now: Instant) {
        if self.started.is_some() && self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// ### English
    /// Animation time at `now`; `0` before the first resume. Frozen while paused.
    ///
    /// ### 中文
    /// `now` 时刻的动画时间；首次 resume 之前为 `0`；暂停期间保持不变。
    pub(crate) fn tick_ms(&self, now: Instant) -> u64 {
        let Some(started) = self.started else {
            return 0;
        };
        let end = self.paused_at.unwrap_or(now);
        let elapsed = end
            .saturating_duration_since(started)
            .saturating_sub(self.paused_total);
        u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn zero_before_first_resume() {
        let clock = FrameClock::default();
        assert_eq!(clock.tick_ms(Instant::now()), 0);
    }

    #[test]
    fn paused_time_is_excluded() {
        let t0 = Instant::now();
        let mut clock = FrameClock::default();
        clock.resume(t0);
        assert_eq!(clock.tick_ms(t0 + ms(100)), 100);

        clock.pause(t0 + ms(100));
        assert_eq!(clock.tick_ms(t0 + ms(900)), 100);

        clock.resume(t0 + ms(1000));
        assert_eq!(clock.tick_ms(t0 + ms(1050)), 150);
    }

    #[test]
    fn repeated_pause_keeps_first_timestamp() {
        let t0 = Instant::now();
        let mut clock = FrameClock::default();
        clock.resume(t0);
        clock.pause(t0 + ms(10));
        clock.pause(t0 + ms(500));
        clock.resume(t0 + ms(510));
        assert_eq!(clock.tick_ms(t0 + ms(520)), 20);
    }
}
