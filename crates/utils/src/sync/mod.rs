//! Single-owner access primitives
//!
//! [`ExclusiveCell`] guards one mutable value; [`SerialQueue`] builds a
//! per-instance FIFO task runner on top of it.

mod cell;
mod queue;

pub use cell::ExclusiveCell;
pub use queue::{QueueError, SerialQueue};
