//! Background tasks

pub mod notification_sweep;
pub mod refresh_sweep;

pub use notification_sweep::spawn_notification_sweep_task;
pub use refresh_sweep::spawn_refresh_sweep_task;
