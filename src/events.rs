//! Notifications exchanged between the editor, the form and the preview
//!
//! Components publish [`Event`]s on an [`EventBus`]. Subscribers registered
//! with [`EventBus::subscribe`] see each event as it is published, and the
//! event is also queued so the owning controller can handle it later with
//! [`EventBus::drain`].

use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Something that happened in one component that others react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The template text changed
    TemplateChanged {
        template: String,
        /// Variable names referenced by the template, in order, duplicates kept
        variables: Vec<String>,
    },
    /// Form values changed
    VariablesChanged(HashMap<String, String>),
    /// The user asked to copy the rendered output
    CopyRequested,
    /// The user asked to download the rendered output
    DownloadRequested,
    /// The stored field list was edited outside the form
    FieldsChanged,
}

impl Event {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Event::TemplateChanged { .. } => "template-changed",
            Event::VariablesChanged(_) => "variables-changed",
            Event::CopyRequested => "copy-requested",
            Event::DownloadRequested => "download-requested",
            Event::FieldsChanged => "fields-changed",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Subscriber = Box<dyn FnMut(&Event) + Send>;

/// Publish/subscribe hub with a pending queue
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    queue: VecDeque<Event>,
    next_id: usize,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("queue", &self.queue)
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler called for every published event
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&Event) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Notify subscribers and queue the event
    pub fn publish(&mut self, event: Event) {
        for (_, handler) in &mut self.subscribers {
            handler(&event);
        }
        self.queue.push_back(event);
    }

    /// Take the oldest queued event
    pub fn take_next(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> Vec<Event> {
        self.queue.drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_subscribers_see_events_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        let sink = Arc::clone(&seen);
        bus.subscribe(move |e| sink.lock().unwrap().push(e.name()));

        bus.publish(Event::FieldsChanged);
        bus.publish(Event::CopyRequested);

        assert_eq!(*seen.lock().unwrap(), vec!["fields-changed", "copy-requested"]);
        assert_eq!(bus.pending(), 2);
        assert_eq!(bus.take_next(), Some(Event::FieldsChanged));
        assert_eq!(bus.drain(), vec![Event::CopyRequested]);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Arc::new(Mutex::new(0));
        let mut bus = EventBus::new();
        let counter = Arc::clone(&count);
        let id = bus.subscribe(move |_| *counter.lock().unwrap() += 1);

        bus.publish(Event::DownloadRequested);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(Event::DownloadRequested);

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_display_uses_name() {
        let event = Event::TemplateChanged {
            template: String::new(),
            variables: vec![],
        };
        assert_eq!(event.to_string(), "template-changed");
    }
}
