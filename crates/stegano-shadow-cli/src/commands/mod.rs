pub mod distribute;
pub mod recover;
