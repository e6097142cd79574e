//! Web 路由处理器

pub mod stats;
pub mod translate;

pub use stats::*;
pub use translate::*;
