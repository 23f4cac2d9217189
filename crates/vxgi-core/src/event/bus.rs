// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::{Mutex, PoisonError};

use flume::TrySendError;

/// Default number of undelivered events kept per subscriber before new ones are dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// A bounded, thread-safe broadcast channel.
///
/// Every subscriber gets its own bounded flume queue and receives every event
/// published after it subscribed. Subscribers whose receiver was dropped are
/// forgotten on the next publish. With no subscribers, events are discarded.
///
/// Publishing never blocks: when a subscriber's queue is full the event is
/// dropped for that subscriber and a warning is logged. This keeps the bus
/// safe to use while a lock is held.
#[derive(Debug)]
pub struct EventBus<T: Clone + Send + 'static> {
    subscribers: Mutex<Vec<flume::Sender<T>>>,
    capacity: usize,
}

impl<T: Clone + Send + 'static> EventBus<T> {
    /// Creates a new bus holding at most [`DEFAULT_EVENT_CAPACITY`] pending events per subscriber.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a new bus holding at most `capacity` pending events per subscriber.
    pub fn with_capacity(capacity: usize) -> Self {
        log::trace!("EventBus initialized (capacity={capacity}).");
        Self {
            subscribers: Mutex::new(Vec::new()),
            capacity,
        }
    }

    /// Publishes an event to every live subscriber without blocking.
    ///
    /// ## Returns
    /// `true` if every live subscriber queued the event, `false` if at least
    /// one of them was full and missed it.
    pub fn publish(&self, event: T) -> bool {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut delivered = true;
        subscribers.retain(|sender| match sender.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::warn!("EventBus subscriber full, dropping event. Is anyone draining it?");
                delivered = false;
                true
            }
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("EventBus subscriber went away.");
                false
            }
        });
        delivered
    }

    /// Returns a new receiver that gets every event published from now on.
    pub fn subscribe(&self) -> flume::Receiver<T> {
        let (sender, receiver) = flume::bounded(self.capacity);
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        receiver
    }

    /// Returns the number of subscribers seen alive at the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<T: Clone + Send + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}
