//! 中间件模块

pub mod cache;

pub use cache::no_cache;
