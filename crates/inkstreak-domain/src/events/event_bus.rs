use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;

use super::DomainEvent;
use crate::shared::DomainError;

/// Publishes committed streak events to whoever subscribed
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, event: Box<dyn DomainEvent>) -> Result<(), DomainError>;
}

/// Reacts to one concrete event type
#[async_trait]
pub trait EventHandler<E: DomainEvent>: Send + Sync {
    async fn handle(&self, event: &E) -> Result<(), DomainError>;
}

/// Handler stored by a bus without knowing the concrete event type
#[async_trait]
pub trait DynamicEventHandler: Send + Sync {
    async fn handle_dynamic(&self, event: &dyn DomainEvent) -> Result<(), DomainError>;
}

/// Adapts an `EventHandler<E>` so a bus can keep it next to handlers of other types
pub struct TypedEventHandlerWrapper<E, H> {
    handler: H,
    _event: PhantomData<fn(&E)>,
}

impl<E, H> TypedEventHandlerWrapper<E, H>
where
    E: DomainEvent + 'static,
    H: EventHandler<E>,
{
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            _event: PhantomData,
        }
    }
}

#[async_trait]
impl<E, H> DynamicEventHandler for TypedEventHandlerWrapper<E, H>
where
    E: DomainEvent + 'static,
    H: EventHandler<E>,
{
    async fn handle_dynamic(&self, event: &dyn DomainEvent) -> Result<(), DomainError> {
        match event.as_any().downcast_ref::<E>() {
            Some(typed) => self.handler.handle(typed).await,
            None => Err(DomainError::Infrastructure(format!(
                "Event {} delivered to a handler for {}",
                event.event_type_name(),
                std::any::type_name::<E>()
            ))),
        }
    }
}

/// Wraps `handler` for subscription to events of type `E`
pub fn typed<E, H>(handler: H) -> Arc<dyn DynamicEventHandler>
where
    E: DomainEvent + 'static,
    H: EventHandler<E> + 'static,
{
    Arc::new(TypedEventHandlerWrapper::<E, H>::new(handler))
}
