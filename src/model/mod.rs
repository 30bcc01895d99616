pub mod config;
pub mod id;
pub mod label;
pub mod project;
pub mod section;
pub mod task;

pub use config::*;
pub use label::*;
pub use project::*;
pub use section::*;
pub use task::*;
