//! Data structures backing the simulations.

mod clip_pool;

pub use clip_pool::ClipPool;
