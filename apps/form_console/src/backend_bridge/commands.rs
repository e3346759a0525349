//! Backend commands queued from the console loop to the backend worker.

use form_core::{LoadTicket, TriggerEvent};
use shared::domain::ComponentId;

pub enum BackendCommand {
    LoadComponent {
        ticket: LoadTicket,
        component_id: ComponentId,
    },
    FireTrigger {
        event: TriggerEvent,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadComponent { .. } => "load_component",
            Self::FireTrigger { .. } => "fire_trigger",
        }
    }
}
