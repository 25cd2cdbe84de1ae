use std::{any::Any, io, sync::Arc};

use crate::message::{NodeId, UpdateMessage};

/// Opaque handle to the parameter server's storage, accepted on `init` and not used.
pub type StorageHandle = Arc<dyn Any + Send + Sync>;

/// Opaque handle to the parameter server's clipboard, accepted on `init` and not used.
pub type ClipboardHandle = Arc<dyn Any + Send + Sync>;

/// The node discovery and message delivery layer.
///
/// Delivery across nodes is best effort and unordered.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Returns the id of this node.
    fn own_id(&self) -> NodeId;

    /// Returns the amount of clients currently known to this node.
    fn number_of_known_clients(&self) -> usize;

    /// Sends `message` to every known client whose id isn't in `excluded`.
    ///
    /// # Arguments
    /// * `message` - The message to deliver verbatim.
    /// * `excluded` - The ids of the nodes that mustn't receive it.
    async fn send_to_all_except(
        &self,
        message: &UpdateMessage,
        excluded: &[NodeId],
    ) -> io::Result<()>;
}
