use std::{fmt, ops::Deref, sync::Arc};

/// Stable identifier of a node in the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Identifier of the training task an update belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// An opaque, compressed gradient update.
///
/// Cloning is cheap, forwarding an update to many peers shares the same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedUpdate(Arc<[u8]>);

impl EncodedUpdate {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }
}

impl Deref for EncodedUpdate {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&[u8]> for EncodedUpdate {
    fn from(value: &[u8]) -> Self {
        Self(Arc::from(value))
    }
}

impl From<Vec<u8>> for EncodedUpdate {
    fn from(value: Vec<u8>) -> Self {
        Self(Arc::from(value))
    }
}

/// A gradient update as it travels through the cluster, it's never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateMessage {
    originator_id: NodeId,
    task_id: TaskId,
    updates: EncodedUpdate,
}

impl UpdateMessage {
    /// The wire class name of this message, used for dispatch routing.
    pub const CLASS: &'static str = "SilentUpdatesMessage";

    /// Creates a new `UpdateMessage`.
    ///
    /// # Arguments
    /// * `originator_id` - The node that produced the update.
    /// * `task_id` - The task the update belongs to.
    /// * `updates` - The encoded update.
    pub fn new(originator_id: NodeId, task_id: TaskId, updates: impl Into<EncodedUpdate>) -> Self {
        Self {
            originator_id,
            task_id,
            updates: updates.into(),
        }
    }

    pub fn originator_id(&self) -> NodeId {
        self.originator_id
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn updates(&self) -> &EncodedUpdate {
        &self.updates
    }

    /// Consumes the message, returning the encoded update.
    pub fn into_updates(self) -> EncodedUpdate {
        self.updates
    }
}

/// The outcome of a distributed aggregation round.
///
/// Silent training never aggregates, drivers only receive these to ignore them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub originator_id: NodeId,
    pub task_id: TaskId,
}
