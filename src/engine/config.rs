//! ### English
//! Render surface configuration.
//!
//! ### 中文
//! 渲染 surface 配置。

use std::time::Duration;

use dpi::PhysicalSize;

use super::flags;

/// ### English
/// How the render thread schedules frames while the engine is running.
///
/// ### 中文
/// 引擎运行时渲染线程如何调度帧。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// ### English
    /// Render continuously at `target_fps` (`0` = as fast as possible).
    ///
    /// ### 中文
    /// 以 `target_fps` 持续渲染（`0` = 尽可能快）。
    Continuous { target_fps: u32 },
    /// ### English
    /// Render one frame per request (`request_render`, resume, resize).
    ///
    /// ### 中文
    /// 每次请求（`request_render`、resume、resize）渲染一帧。
    WhenDirty,
}

impl RenderMode {
    /// ### English
    /// Interval between continuous frames; `None` for on-demand rendering.
    ///
    /// ### 中文
    /// 持续渲染时的帧间隔；按需渲染时返回 `None`。
    pub fn frame_interval(self) -> Option<Duration> {
        match self {
            Self::Continuous { target_fps: 0 } => Some(Duration::ZERO),
            Self::Continuous { target_fps } => {
                Some(Duration::from_nanos(1_000_000_000 / u64::from(target_fps)))
            }
            Self::WhenDirty => None,
        }
    }
}

pub const DEFAULT_TARGET_FPS: u32 = 60;
pub const DEFAULT_TOUCH_QUEUE_CAPACITY: usize = 256;
pub const DEFAULT_RENDER_THREAD_NAME: &str = "san-angeles-render";

/// ### English
/// Construction parameters for a render surface.
///
/// ### 中文
/// 渲染 surface 的构造参数。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub render_mode: RenderMode,
    /// ### English
    /// Maximum number of touch events waiting for the render thread; further touches are dropped.
    ///
    /// ### 中文
    /// 等待渲染线程处理的触摸事件上限；超出后新的触摸会被丢弃。
    pub touch_queue_capacity: usize,
    /// ### English
    /// Collapse consecutive queued moves into the latest one.
    ///
    /// ### 中文
    /// 将连续排队的移动事件合并为最新的一个。
    pub coalesce_touch_moves: bool,
    /// ### English
    /// Drawable size assumed until the window system reports one.
    ///
    /// ### 中文
    /// 窗口系统报告尺寸之前假定的可绘制区域尺寸。
    pub initial_size: PhysicalSize<u32>,
    pub thread_name: String,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::Continuous {
                target_fps: DEFAULT_TARGET_FPS,
            },
            touch_queue_capacity: DEFAULT_TOUCH_QUEUE_CAPACITY,
            coalesce_touch_moves: true,
            initial_size: PhysicalSize::new(1, 1),
            thread_name: DEFAULT_RENDER_THREAD_NAME.to_string(),
        }
    }
}

impl SurfaceConfig {
    /// ### English
    /// Builds a config from C ABI parameters.
    ///
    /// #### Parameters
    /// - `width`/`height`: Initial drawable size (0 is clamped to 1).
    /// - `target_fps`: Continuous frame rate (`0` = unthrottled); ignored with `RENDER_WHEN_DIRTY`.
    /// - `surface_flags`: `SAN_ANGELES_SURFACE_FLAG_*` bitmask.
    ///
    /// ### 中文
    /// 根据 C ABI 参数构造配置。
    ///
    /// #### 参数
    /// - `width`/`height`：初始可绘制尺寸（0 会被钳制为 1）。
    /// - `target_fps`：持续渲染帧率（`0` = 不限速）；设置 `RENDER_WHEN_DIRTY` 时被忽略。
    /// - `surface_flags`：`SAN_ANGELES_SURFACE_FLAG_*` 位掩码。
    pub fn from_flags(width: u32, height: u32, target_fps: u32, surface_flags: u32) -> Self {
        let render_when_dirty =
            (surface_flags & flags::SAN_ANGELES_SURFACE_FLAG_RENDER_WHEN_DIRTY) != 0;
        let no_touch_coalescing =
            (surface_flags & flags::SAN_ANGELES_SURFACE_FLAG_NO_TOUCH_COALESCING) != 0;

        let render_mode = if render_when_dirty {
            RenderMode::WhenDirty
        } else {
            RenderMode::Continuous { target_fps }
        };

        Self {
            render_mode,
            coalesce_touch_moves: !no_touch_coalescing,
            initial_size: PhysicalSize::new(width, height),
            ..Self::default()
        }
        .normalized()
    }

    /// ### English
    /// Clamps degenerate values (zero capacity, zero extents).
    ///
    /// ### 中文
    /// 钳制退化值（容量为 0、尺寸为 0）。
    pub fn normalized(mut self) -> Self {
        self.touch_queue_capacity = self.touch_queue_capacity.max(1);
        self.initial_size = clamp_size(self.initial_size);
        if self.thread_name.is_empty() {
            self.thread_name = DEFAULT_RENDER_THREAD_NAME.to_string();
        }
        self
    }
}

#[inline]
pub(crate) fn clamp_size(size: PhysicalSize<u32>) -> PhysicalSize<u32> {
    PhysicalSize::new(size.width.max(1), size.height.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_select_render_mode_and_coalescing() {
        let config = SurfaceConfig::from_flags(640, 480, 30, 0);
        assert_eq!(config.render_mode, RenderMode::Continuous { target_fps: 30 });
        assert!(config.coalesce_touch_moves);

        let config = SurfaceConfig::from_flags(
            640,
            480,
            30,
            flags::SAN_ANGELES_SURFACE_FLAG_RENDER_WHEN_DIRTY
                | flags::SAN_ANGELES_SURFACE_FLAG_NO_TOUCH_COALESCING,
        );
        assert_eq!(config.render_mode, RenderMode::WhenDirty);
        assert!(!config.coalesce_touch_moves);
    }

    #[test]
    fn degenerate_values_are_clamped() {
        let config = SurfaceConfig {
            touch_queue_capacity: 0,
            initial_size: PhysicalSize::new(0, 720),
            thread_name: String::new(),
            ..SurfaceConfig::default()
        }
        .normalized();

        assert_eq!(config.touch_queue_capacity, 1);
        assert_eq!(config.initial_size, PhysicalSize::new(1, 720));
        assert_eq!(config.thread_name, DEFAULT_RENDER_THREAD_NAME);
    }

    #[test]
    fn frame_interval_follows_target_fps() {
        assert_eq!(
            RenderMode::Continuous { target_fps: 50 }.frame_interval(),
            Some(Duration::from_millis(20))
        );
        assert_eq!(
            RenderMode::Continuous { target_fps: 0 }.frame_interval(),
            Some(Duration::ZERO)
        );
        assert_eq!(RenderMode::WhenDirty.frame_interval(), None);
    }
}
