//! Domain types and DTOs
//!
//! Request inputs, intermediate pipeline results, and the estimate shapes
//! returned to callers.

pub mod estimate;
pub mod input;
pub mod legacy;
pub mod personality;
pub mod strategy;
pub mod traits;
pub mod ui;

// Re-export commonly used types
pub use estimate::*;
pub use input::*;
pub use personality::*;
pub use strategy::*;
pub use traits::*;
pub use ui::*;

// Legacy wire types are accessed via crate::domain::legacy:: to keep them
// out of the modern namespace
