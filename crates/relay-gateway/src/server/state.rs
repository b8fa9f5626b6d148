//! Gateway state
//!
//! Application state for the gateway server.

use crate::broadcast::Broadcaster;
use crate::connection::ConnectionRegistry;
use crate::handlers::EventRouter;
use crate::rooms::RoomIndex;
use relay_core::IdentityVerifier;
use relay_queue::JobBroker;
use std::sync::Arc;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Live sessions by user
    registry: Arc<ConnectionRegistry>,
    /// Room membership index
    rooms: Arc<RoomIndex>,
    /// Client event dispatch
    router: Arc<EventRouter>,
    /// Credential verification at connect time
    verifier: Arc<dyn IdentityVerifier>,
}

impl GatewayState {
    /// Wire up the gateway collaborators over a verifier and job broker
    #[must_use]
    pub fn new(verifier: Arc<dyn IdentityVerifier>, broker: Arc<dyn JobBroker>) -> Self {
        let registry = ConnectionRegistry::new_shared();
        let rooms = Arc::new(RoomIndex::new());
        let broadcaster = Arc::new(Broadcaster::new(registry.clone(), rooms.clone()));
        let router = Arc::new(EventRouter::new(rooms.clone(), broadcaster, broker));

        Self {
            registry,
            rooms,
            router,
            verifier,
        }
    }

    /// Get the connection registry
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Get the room index
    pub fn rooms(&self) -> &RoomIndex {
        &self.rooms
    }

    /// Get the event router
    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    /// Get the identity verifier
    pub fn verifier(&self) -> &dyn IdentityVerifier {
        self.verifier.as_ref()
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("registry", &self.registry)
            .field("rooms", &self.rooms)
            .finish()
    }
}
