//! Filesystem operations: name resolution and collision-safe placement.

mod atomic;
mod helpers;
mod resolve;
mod safe_move;

pub use helpers::describe_io_error;
pub use resolve::{resolve_unique_name, MAX_UNIQUE_ATTEMPTS};
pub use safe_move::{copy_safely, move_safely, MoveOperation, Placed};
