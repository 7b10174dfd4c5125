//! Subscriber fan-out for roast events.
//!
//! The control thread is the only producer.  Each subscriber gets its own
//! bounded `embassy-sync` channel so a slow reader can never stall the
//! control loop: when a queue is full the event is dropped for that
//! subscriber only.
//!
//! ```text
//!                     ┌──────────────┐     ┌──────────────┐
//!                 ┌──▶│  Channel[0]  │────▶│ Subscription │  (web socket)
//! ┌────────────┐  │   └──────────────┘     └──────────────┘
//! │ Control    │──┤   ┌──────────────┐     ┌──────────────┐
//! │ thread     │  └──▶│  Channel[1]  │────▶│ Subscription │  (console)
//! └────────────┘      └──────────────┘     └──────────────┘
//! ```

use core::cell::RefCell;
use std::sync::Arc;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;
use log::{debug, warn};

use crate::app::events::RoastEvent;
use crate::app::ports::EventSink;

/// Maximum number of concurrent subscribers.
pub const MAX_SUBSCRIBERS: usize = 4;

/// Per-subscriber queue depth.
pub const EVENT_QUEUE_DEPTH: usize = 32;

type EventQueue = Channel<CriticalSectionRawMutex, RoastEvent, EVENT_QUEUE_DEPTH>;

/// Registry of subscriber queues.
pub struct EventBus {
    queues: Mutex<CriticalSectionRawMutex, RefCell<Vec<Arc<EventQueue>, MAX_SUBSCRIBERS>>>,
}

impl EventBus {
    pub const fn new() -> Self {
        Self {
            queues: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    /// Register a new subscriber.  `None` when all slots are taken.
    pub fn subscribe(&self) -> Option<Subscription> {
        self.queues.lock(|queues| {
            let mut queues = queues.borrow_mut();
            prune(&mut queues);
            let queue = Arc::new(EventQueue::new());
            match queues.push(queue.clone()) {
                Ok(()) => {
                    debug!("Event subscriber added ({} active)", queues.len());
                    Some(Subscription { queue })
                }
                Err(_) => {
                    warn!("Event bus full ({} subscribers)", MAX_SUBSCRIBERS);
                    None
                }
            }
        })
    }

    /// Deliver `event` to every live subscriber without blocking.
    pub fn publish(&self, event: &RoastEvent) {
        self.queues.lock(|queues| {
            let mut queues = queues.borrow_mut();
            prune(&mut queues);
            for (i, queue) in queues.iter().enumerate() {
                if queue.try_send(event.clone()).is_err() {
                    warn!("Subscriber {} queue full, dropping event", i);
                }
            }
        });
    }

    /// Live subscriber count.
    pub fn subscriber_count(&self) -> usize {
        self.queues.lock(|queues| {
            let mut queues = queues.borrow_mut();
            prune(&mut queues);
            queues.len()
        })
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop queues whose [`Subscription`] is gone.
fn prune(queues: &mut Vec<Arc<EventQueue>, MAX_SUBSCRIBERS>) {
    queues.retain(|q| Arc::strong_count(q) > 1);
}

impl EventSink for EventBus {
    fn emit(&mut self, event: &RoastEvent) {
        self.publish(event);
    }
}

impl EventSink for Arc<EventBus> {
    fn emit(&mut self, event: &RoastEvent) {
        self.publish(event);
    }
}

// ── Subscription ─────────────────────────────────────────────

/// Receiving end of one subscriber queue.  Dropping it unsubscribes.
pub struct Subscription {
    queue: Arc<EventQueue>,
}

impl Subscription {
    /// Next queued event, if any.
    pub fn try_next(&self) -> Option<RoastEvent> {
        self.queue.try_receive().ok()
    }

    /// Wait for the next event.
    pub async fn next(&self) -> RoastEvent {
        self.queue.receive().await
    }

    /// Everything currently queued, oldest first.
    pub fn drain(&self) -> std::vec::Vec<RoastEvent> {
        core::iter::from_fn(|| self.try_next()).collect()
    }
}
