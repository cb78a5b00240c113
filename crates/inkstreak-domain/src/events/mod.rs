use std::any::Any;

pub mod event_bus;
pub mod streak_events;

pub use event_bus::{typed, DynamicEventHandler, EventBus, EventHandler};

/// Base trait for all domain events
/// All events must be Send + Sync for thread safety
pub trait DomainEvent: Send + Sync + Any {
    /// Convert to Any for type-safe downcasting
    fn as_any(&self) -> &(dyn Any + Send + Sync);

    /// Concrete type name, used as the subscription key
    fn event_type_name(&self) -> &'static str;
}
