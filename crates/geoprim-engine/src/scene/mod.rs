//! Draw-command types handed to the host.
//!
//! Responsibilities:
//! - describe one GPU draw as a renderer-agnostic `DrawCommand`
//! - name the scene projection modes and render passes
//! - map border styles to primitive topology

mod border;
mod cmd;
mod mode;

pub use border::{Border, BorderStyle};
pub use cmd::{DrawCommand, Pass, PrimitiveType};
pub use mode::SceneMode;
