mod render;
mod root;

pub use render::{RenderCommand, StackAction};
pub use root::{Cli, Commands};
