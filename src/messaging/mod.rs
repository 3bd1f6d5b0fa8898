// Messaging module - Push kinds and frame routing
pub mod event;
pub mod router;

pub use event::PushKind;
pub use router::MessageRouter;
