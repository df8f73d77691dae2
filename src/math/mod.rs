//! Vector and frame math
//!
//! Pure value types: nothing here allocates or logs except the degenerate
//! frame fallback in `Basis`.

pub mod basis;
pub mod vector;

pub use basis::{Basis, revert_matrix};
pub use vector::VectorExt;
