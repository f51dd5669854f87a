pub mod distribute;
pub mod recover;
mod shared;

pub use shared::*;
