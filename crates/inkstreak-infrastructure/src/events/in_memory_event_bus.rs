use async_trait::async_trait;
use log::{debug, error, info};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use inkstreak_domain::events::{DomainEvent, DynamicEventHandler, EventBus};
use inkstreak_domain::shared::DomainError;

type HandlerMap = HashMap<&'static str, Vec<Arc<dyn DynamicEventHandler>>>;

/// Dispatches events to subscribers in-process, in subscription order.
///
/// A failing handler is logged and does not stop the remaining handlers.
pub struct InMemoryEventBus {
    handlers: Arc<RwLock<HandlerMap>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn subscribe<E: DomainEvent + 'static>(&self, handler: Arc<dyn DynamicEventHandler>) {
        let event_type_name = std::any::type_name::<E>();
        let mut handlers = self.handlers.write().await;

        handlers.entry(event_type_name).or_default().push(handler);

        info!("Subscribed handler for event type: {}", event_type_name);
    }

    pub async fn handler_count<E: DomainEvent + 'static>(&self) -> usize {
        let handlers = self.handlers.read().await;
        handlers
            .get(std::any::type_name::<E>())
            .map_or(0, |h| h.len())
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, event: Box<dyn DomainEvent>) -> Result<(), DomainError> {
        let event_type_name = event.event_type_name();
        let handlers = self.handlers.read().await;

        let Some(event_handlers) = handlers.get(event_type_name) else {
            debug!("No handlers registered for event type: {}", event_type_name);
            return Ok(());
        };

        debug!(
            "Publishing {} to {} handler(s)",
            event_type_name,
            event_handlers.len()
        );

        for handler in event_handlers {
            if let Err(e) = handler.handle_dynamic(&*event).await {
                error!("Handler failed to process event {}: {}", event_type_name, e);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use inkstreak_domain::events::streak_events::{BadgeUnlocked, UserRegistered};
    use inkstreak_domain::events::{typed, EventHandler};
    use inkstreak_domain::shared::UserId;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl EventHandler<UserRegistered> for CountingHandler {
        async fn handle(&self, _event: &UserRegistered) -> Result<(), DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DomainError::Infrastructure("handler failed".into()));
            }
            Ok(())
        }
    }

    fn registered() -> Box<dyn DomainEvent> {
        Box::new(UserRegistered {
            user_id: UserId::from_string("writer"),
            max_streak_freezes_allowed: 3,
            occurred_at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_event_bus_publishes_to_handlers() {
        let bus = InMemoryEventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let handler = CountingHandler {
            calls: calls.clone(),
            fail: false,
        };
        bus.subscribe::<UserRegistered>(typed::<UserRegistered, _>(handler))
            .await;

        bus.publish(registered()).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(bus.handler_count::<UserRegistered>().await, 1);
        assert_eq!(bus.handler_count::<BadgeUnlocked>().await, 0);
    }

    #[tokio::test]
    async fn test_failing_handler_does_not_block_others() {
        let bus = InMemoryEventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for fail in [true, false] {
            let handler = CountingHandler {
                calls: calls.clone(),
                fail,
            };
            bus.subscribe::<UserRegistered>(typed::<UserRegistered, _>(handler))
                .await;
        }

        bus.publish(registered()).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let bus = InMemoryEventBus::default();
        let event = Box::new(BadgeUnlocked {
            user_id: UserId::new(),
            badge_name: "Week Warrior".into(),
            occurred_at: Utc::now(),
        });

        assert!(bus.publish(event).await.is_ok());
    }

    #[tokio::test]
    async fn test_handler_rejects_foreign_event_type() {
        let handler = typed::<UserRegistered, _>(CountingHandler {
            calls: Arc::new(AtomicUsize::new(0)),
            fail: false,
        });
        let event = BadgeUnlocked {
            user_id: UserId::new(),
            badge_name: "Week Warrior".into(),
            occurred_at: Utc::now(),
        };

        let result = handler.handle_dynamic(&event).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
