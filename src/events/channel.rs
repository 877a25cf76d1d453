//! Event channel implementation using crossbeam-channel.
//!
//! Lets worker threads report progress to whichever front end is listening.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use super::Event;

/// Sends events from the library.
///
/// Cheap to clone and safe to share between rayon workers.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event.
    ///
    /// If the receiver is gone the event is dropped; reporting is optional.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receives events from the library
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event is received
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Iterate until every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Constructors for sender/receiver pairs
pub struct EventChannel;

impl EventChannel {
    /// Create a new unbounded event channel
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }

    /// Create a bounded event channel; senders block when it is full
    pub fn bounded(capacity: usize) -> (EventSender, EventReceiver) {
        let (sender, receiver) = bounded(capacity);
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A sender nobody listens to
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{PrepareEvent, PrepareProgress};
    use std::thread;

    #[test]
    fn events_can_be_sent_across_threads() {
        let (sender, receiver) = EventChannel::new();

        let handle = thread::spawn(move || {
            sender.send(Event::Prepare(PrepareEvent::Progress(PrepareProgress {
                completed: 3,
                total: 4,
                current_name: "IMG_3.jpg".to_string(),
            })));
        });

        handle.join().unwrap();

        match receiver.recv().unwrap() {
            Event::Prepare(PrepareEvent::Progress(p)) => {
                assert_eq!(p.completed, 3);
                assert_eq!(p.current_name, "IMG_3.jpg");
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn null_sender_does_not_panic() {
        let sender = null_sender();
        sender.send(Event::Prepare(PrepareEvent::Started { total_files: 1 }));
    }

    #[test]
    fn receiver_iteration_ends_when_senders_drop() {
        let (sender, receiver) = EventChannel::bounded(4);
        sender.send(Event::Prepare(PrepareEvent::Started { total_files: 2 }));
        sender.send(Event::Prepare(PrepareEvent::Started { total_files: 2 }));
        drop(sender);

        assert_eq!(receiver.iter().count(), 2);
        assert!(receiver.try_recv().is_none());
    }
}
