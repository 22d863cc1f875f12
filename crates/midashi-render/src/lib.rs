// this_file: crates/midashi-render/src/lib.rs

//! Compositing, export and batch generation for midashi.

pub mod batch;
pub mod compositor;
pub mod export;
pub mod pdf;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{BatchFailure, BatchPlan, BatchRenderer, BatchReport};
pub use compositor::Compositor;
pub use export::export;
