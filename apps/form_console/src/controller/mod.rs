//! Controller layer: backend events, command orchestration, and the console
//! loop that owns the detail session.

pub mod console;
pub mod events;
pub mod orchestration;
