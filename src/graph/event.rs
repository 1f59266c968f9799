//! Graph mutation events
//!
//! Raised by the connection manager after a store mutation commits. Result
//! caches subscribe to drop entries of the mutated graph, audit consumers can
//! take an asynchronous feed of the same events.

use super::types::NodeId;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphEvent {
    ConnectionAdded {
        graph: String,
        node1: NodeId,
        node2: NodeId,
    },
    ConnectionDeleted {
        graph: String,
        node1: NodeId,
        node2: NodeId,
    },
    ConnectionsDeletedFromNode {
        graph: String,
        node: NodeId,
    },
}

impl GraphEvent {
    /// Name of the graph the mutation happened on
    pub fn graph(&self) -> &str {
        match self {
            GraphEvent::ConnectionAdded { graph, .. }
            | GraphEvent::ConnectionDeleted { graph, .. }
            | GraphEvent::ConnectionsDeletedFromNode { graph, .. } => graph,
        }
    }
}

/// Synchronous subscriber, called on the publishing task
pub trait GraphEventHandler: Send + Sync {
    fn handle(&self, event: &GraphEvent);
}

/// Per-process invalidation topic
///
/// Subscribers are fixed at construction; the bus is shared behind an `Arc`.
#[derive(Default)]
pub struct GraphEventBus {
    handlers: Vec<Arc<dyn GraphEventHandler>>,
    audit_sender: Option<UnboundedSender<GraphEvent>>,
}

impl GraphEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(mut self, handler: Arc<dyn GraphEventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Also forward every event to an unbounded channel
    pub fn with_audit_feed(mut self) -> (Self, UnboundedReceiver<GraphEvent>) {
        let (tx, rx) = unbounded_channel();
        self.audit_sender = Some(tx);
        (self, rx)
    }

    pub fn publish(&self, event: GraphEvent) {
        debug!("Publishing graph event {:?}", event);

        for handler in &self.handlers {
            handler.handle(&event);
        }

        if let Some(sender) = &self.audit_sender {
            // A dropped receiver only means nobody audits anymore
            let _ = sender.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<GraphEvent>>);

    impl GraphEventHandler for Recorder {
        fn handle(&self, event: &GraphEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_handlers_and_audit_feed() {
        let recorder = Arc::new(Recorder::default());
        let (bus, mut feed) = GraphEventBus::new()
            .subscribe(recorder.clone())
            .with_audit_feed();

        bus.publish(GraphEvent::ConnectionsDeletedFromNode {
            graph: "notions".to_string(),
            node: NodeId(4),
        });

        assert_eq!(recorder.0.lock().unwrap().len(), 1);
        let audited = feed.recv().await.unwrap();
        assert_eq!(audited.graph(), "notions");
    }

    #[test]
    fn test_publish_without_receiver_does_not_fail() {
        let (bus, feed) = GraphEventBus::new().with_audit_feed();
        drop(feed);
        bus.publish(GraphEvent::ConnectionAdded {
            graph: "g".to_string(),
            node1: NodeId(1),
            node2: NodeId(2),
        });
    }
}
