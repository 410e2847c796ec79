//! ### English
//! Render-surface runtime (public API): the surface, its render thread, and the command queue
//! between them.
//!
//! ### 中文
//! 渲染 surface 运行时（对外公开 API）：surface、其渲染线程以及二者之间的命令队列。

mod command;
mod queue;
mod render_thread;

mod surface;

pub use surface::RenderSurface;
