//! Embassy async tasks

pub mod bringup;
pub mod status;

pub use bringup::bringup_task;
pub use status::status_task;
