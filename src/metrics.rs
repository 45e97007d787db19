use serde_json::Value;
use std::sync::{Arc, Mutex};

macro_rules! lock {
    ($name: expr) => {
        match $name.lock() {
            Ok(locked) => locked,
            Err(e) => panic!("{:#?}", e),
        }
    };
}

/// Hand-off of performance payloads from whoever measures them to the tree
/// builder. Clones share the same queue; the newest payload is taken first.
#[derive(Debug, Clone, Default)]
pub struct MetricsQueue {
    pending: Arc<Mutex<Vec<Value>>>,
}

impl MetricsQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, values: Value) {
        lock!(self.pending).push(values);
    }

    pub fn pop(&self) -> Option<Value> {
        lock!(self.pending).pop()
    }

    pub fn len(&self) -> usize {
        lock!(self.pending).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::MetricsQueue;
    use serde_json::json;

    #[test]
    fn test_clones_share_pending_payloads() {
        let producer = MetricsQueue::new();
        let consumer = producer.clone();

        producer.push(json!({ "memory": 10 }));
        producer.push(json!({ "memory": 20 }));
        assert_eq!(consumer.len(), 2);

        assert_eq!(consumer.pop(), Some(json!({ "memory": 20 })));
        assert_eq!(consumer.pop(), Some(json!({ "memory": 10 })));
        assert_eq!(consumer.pop(), None);
        assert!(producer.is_empty());
    }
}
