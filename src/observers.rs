use tracing::{info, warn};

use crate::events::CirculationEvent;

/// Trait for circulation event observation
pub trait CirculationObserver {
    /// Called after the catalog has been updated for `event`
    fn on_event(&self, event: &CirculationEvent);
}

/// Forwards circulation events to `tracing`
#[derive(Debug, Default)]
pub struct EventLogger;

impl CirculationObserver for EventLogger {
    fn on_event(&self, event: &CirculationEvent) {
        match event {
            CirculationEvent::Issued { book, member } => {
                info!(%book, %member, "book issued");
            }
            CirculationEvent::Waitlisted { book, member, position } => {
                info!(%book, %member, position, "member added to wait-list");
            }
            CirculationEvent::AlreadyWaiting { book, member, position } => {
                info!(%book, %member, position, "member already on wait-list");
            }
            CirculationEvent::Returned { book, member } => {
                info!(%book, %member, "book returned");
            }
            CirculationEvent::AutoIssued { book, member } => {
                info!(%book, %member, "book auto-issued to waiting member");
            }
            CirculationEvent::PromotionDropped { book, member } => {
                warn!(%book, %member, "waiting member no longer exists, entry dropped");
            }
        }
    }
}
