use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{bounded, select, Receiver, Sender, TryRecvError};
use thiserror::Error;

use crate::event::Event;

pub(crate) const DEFAULT_QUEUE_CAPACITY: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum QueueError {
    #[error("event queue is closed")]
    Closed,
}

/// Outcome of a bounded wait on the queue.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Received {
    Event(Event),
    Timeout,
    /// `StreamClosed` was already delivered; nothing more will arrive.
    Finished,
}

struct Inner {
    tx: Sender<Event>,
    rx: Receiver<Event>,
    // Dropping the sender is the close signal; every waiter on `close_rx`
    // wakes up at once.
    close_tx: Mutex<Option<Sender<()>>>,
    close_rx: Receiver<()>,
    close_delivered: AtomicBool,
}

/// Ordered, bounded event pipe. Any number of producers may `send`
/// concurrently; exactly one consumer calls `recv`.
#[derive(Clone)]
pub(crate) struct EventQueue {
    inner: Arc<Inner>,
}

impl EventQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity.max(1));
        let (close_tx, close_rx) = bounded::<()>(0);
        Self {
            inner: Arc::new(Inner {
                tx,
                rx,
                close_tx: Mutex::new(Some(close_tx)),
                close_rx,
                close_delivered: AtomicBool::new(false),
            }),
        }
    }

    /// Enqueue an event, suspending while the queue is full. Fails once the
    /// queue has been closed.
    pub(crate) fn send(&self, event: Event) -> Result<(), QueueError> {
        if self.is_closed() {
            return Err(QueueError::Closed);
        }
        select! {
            send(self.inner.tx, event) -> res => res.map_err(|_| QueueError::Closed),
            recv(self.inner.close_rx) -> _ => Err(QueueError::Closed),
        }
    }

    /// Block until the next event. Buffered events are delivered first after
    /// a close; then `StreamClosed` is synthesized exactly once and every
    /// later call returns `None`.
    #[cfg(test)]
    pub(crate) fn recv(&self) -> Option<Event> {
        if let Some(received) = self.try_buffered() {
            return received;
        }
        select! {
            recv(self.inner.rx) -> msg => match msg {
                Ok(event) => Some(event),
                Err(_) => self.closed_event(),
            },
            recv(self.inner.close_rx) -> _ => match self.inner.rx.try_recv() {
                Ok(event) => Some(event),
                Err(_) => self.closed_event(),
            },
        }
    }

    /// Like `recv` but gives up after `timeout`.
    pub(crate) fn recv_timeout(&self, timeout: Duration) -> Received {
        if let Some(received) = self.try_buffered() {
            return received.map_or(Received::Finished, Received::Event);
        }
        select! {
            recv(self.inner.rx) -> msg => match msg {
                Ok(event) => Received::Event(event),
                Err(_) => self.closed_event().map_or(Received::Finished, Received::Event),
            },
            recv(self.inner.close_rx) -> _ => match self.inner.rx.try_recv() {
                Ok(event) => Received::Event(event),
                Err(_) => self.closed_event().map_or(Received::Finished, Received::Event),
            },
            default(timeout) => Received::Timeout,
        }
    }

    /// Signal shutdown. Safe to call any number of times, including after the
    /// consumer has already exited.
    pub(crate) fn close(&self) {
        let taken = match self.inner.close_tx.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if taken.is_some() {
            tracing::debug!("event queue closed");
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        match self.inner.close_tx.lock() {
            Ok(guard) => guard.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }

    /// Non-blocking check: `Some` when there is an answer without waiting.
    fn try_buffered(&self) -> Option<Option<Event>> {
        match self.inner.rx.try_recv() {
            Ok(event) => Some(Some(event)),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {
                if self.is_closed() {
                    Some(self.closed_event())
                } else {
                    None
                }
            }
        }
    }

    fn closed_event(&self) -> Option<Event> {
        if self.inner.close_delivered.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Event::StreamClosed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn events_arrive_in_enqueue_order() {
        let queue = EventQueue::new(8);
        queue.send(Event::AgentThinking).expect("send thinking");
        queue.send(Event::reply("done")).expect("send reply");
        queue.send(Event::CommandFinished).expect("send finished");

        assert_eq!(queue.recv(), Some(Event::AgentThinking));
        assert_eq!(queue.recv(), Some(Event::reply("done")));
        assert_eq!(queue.recv(), Some(Event::CommandFinished));
    }

    #[test]
    fn close_drains_buffered_events_then_stream_closed_once() {
        let queue = EventQueue::new(4);
        queue.send(Event::reply("last")).expect("send");
        queue.close();

        assert_eq!(queue.recv(), Some(Event::reply("last")));
        assert_eq!(queue.recv(), Some(Event::StreamClosed));
        assert_eq!(queue.recv(), None);
        assert_eq!(queue.recv_timeout(Duration::from_millis(1)), Received::Finished);
    }

    #[test]
    fn close_is_idempotent_and_rejects_new_events() {
        let queue = EventQueue::new(4);
        queue.close();
        queue.close();
        assert!(queue.is_closed());
        assert_eq!(queue.send(Event::AgentThinking), Err(QueueError::Closed));
    }

    #[test]
    fn close_wakes_blocked_consumer() {
        let queue = EventQueue::new(4);
        let consumer = queue.clone();
        let handle = thread::spawn(move || consumer.recv());
        thread::sleep(Duration::from_millis(20));
        queue.close();
        assert_eq!(handle.join().expect("join consumer"), Some(Event::StreamClosed));
    }

    #[test]
    fn close_releases_producer_blocked_on_full_queue() {
        let queue = EventQueue::new(1);
        queue.send(Event::AgentThinking).expect("fill queue");
        let producer = queue.clone();
        let handle = thread::spawn(move || producer.send(Event::CommandFinished));
        thread::sleep(Duration::from_millis(20));
        queue.close();
        assert_eq!(handle.join().expect("join producer"), Err(QueueError::Closed));
    }

    #[test]
    fn recv_timeout_reports_timeout_on_empty_open_queue() {
        let queue = EventQueue::new(2);
        assert_eq!(queue.recv_timeout(Duration::from_millis(5)), Received::Timeout);
    }

    #[test]
    fn concurrent_producers_each_keep_their_own_order() {
        let queue = EventQueue::new(2);
        let handles: Vec<_> = (0..3)
            .map(|p| {
                let q = queue.clone();
                thread::spawn(move || {
                    for i in 0..20 {
                        q.send(Event::output_line(format!("{p}:{i}"))).expect("send");
                    }
                })
            })
            .collect();

        let mut seen: Vec<Vec<usize>> = vec![Vec::new(); 3];
        for _ in 0..60 {
            match queue.recv() {
                Some(Event::CommandOutputLine { message }) => {
                    let (p, i) = message.split_once(':').expect("producer:index");
                    seen[p.parse::<usize>().expect("producer")].push(i.parse().expect("index"));
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
        for h in handles {
            h.join().expect("join producer");
        }
        for order in seen {
            assert_eq!(order, (0..20).collect::<Vec<_>>());
        }
    }
}
