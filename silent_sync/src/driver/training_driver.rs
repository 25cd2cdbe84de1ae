use std::sync::Arc;

use crate::{
    config::ClusterConfig,
    error::Result,
    message::{Aggregation, NodeId, TaskId},
    transport::{ClipboardHandle, StorageHandle, Transport},
};

/// The interface the dispatch layer drives for every message class it routes.
///
/// The dispatch layer calls every method unconditionally, drivers that don't take part
/// in some stage of the protocol implement it as a no-op.
#[async_trait::async_trait]
pub trait TrainingDriver<M: Send + 'static>: Send + Sync {
    /// Binds the driver to the cluster, must be called exactly once before any message.
    ///
    /// # Arguments
    /// * `config` - The cluster configuration.
    /// * `transport` - The transport used to reach the other nodes.
    /// * `storage` - Accepted for interface compatibility.
    /// * `clipboard` - Accepted for interface compatibility.
    fn init(
        &self,
        config: ClusterConfig,
        transport: Arc<dyn Transport>,
        storage: Option<StorageHandle>,
        clipboard: Option<ClipboardHandle>,
    ) -> Result<()>;

    /// Handles an incoming message of the driver's class.
    async fn start_training(&self, message: M) -> Result<()>;

    /// Picks up a message answered by another node.
    fn pick_training(&self, message: &M);

    /// Receives the result of a finished aggregation.
    fn aggregation_finished(&self, aggregation: &Aggregation);

    /// Runs the final stage of a task, at the end of the job.
    fn finish_training(&self, originator_id: NodeId, task_id: TaskId) -> Result<()>;

    /// Registers interest in the completion of a message.
    fn add_completion_hook(&self, originator_id: NodeId, frame_id: u64, message_id: u64);

    /// Returns the class name of the messages this driver handles.
    fn target_message_class(&self) -> &'static str;
}
