// Page rendering: block registry, dispatch loop and leptos SSR components

pub mod components;
pub mod fragment;
pub mod page;
pub mod registry;
pub mod render;
pub mod rich_text;

pub use fragment::Fragment;
pub use page::{PageOptions, RenderedPage, render_page};
pub use registry::{Registry, Renderer};
pub use render::{Rendered, SkipReason, SkippedBlock, render_blocks};
pub use rich_text::render_rich_text;
