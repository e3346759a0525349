//! State and trigger handling for the component detail form.
//!
//! [`store`] holds the reducer over the detail state, [`trigger`] forwards
//! field-level triggers to the action endpoint, and [`view`] picks what the
//! detail pane shows and binds the renderer callbacks. [`session`] and
//! [`fetch`] connect the store to the component server.

pub mod config;
pub mod error;
pub mod fetch;
pub mod session;
pub mod store;
pub mod trigger;
pub mod view;

pub use error::{LoadError, TriggerError};
pub use fetch::{ComponentSpecSource, HttpComponentSpecSource};
pub use session::{DetailSession, LoadFailurePolicy, LoadTicket};
pub use store::{reduce, DetailAction, DetailState, InvalidTransition, SelectionState};
pub use trigger::{
    declared_triggers, TriggerDispatcher, TriggerEndpoint, TriggerEvent, TriggerOutcome,
};
pub use view::{select_view, DetailView, FormBindings, ViewClosed};
