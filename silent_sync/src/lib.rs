//! Silent gradient synchronization.
//!
//! A master node absorbs encoded gradient updates from every worker, applies them to the
//! shared parameters on a throttled cadence and echoes each update to the rest of the
//! cluster. Workers only buffer the updates they receive for a local accumulator.

mod applier;
mod buffer;
mod codec;
mod config;
mod dispatch;
mod driver;
mod error;
mod message;
pub mod optimization;
mod transport;

#[cfg(test)]
mod tests;

pub use applier::{apply_and_reset, zeros_like};
pub use buffer::{DEFAULT_BUFFER_CAPACITY, UpdateBuffer};
pub use codec::ThresholdCodec;
pub use config::ClusterConfig;
pub use dispatch::Dispatcher;
pub use driver::{DriverBuilder, DriverState, SilentTrainingDriver, TrainingDriver};
pub use error::{BoxedErr, ConfigErr, DriverErr, Result, ShapeMismatchErr};
pub use message::{Aggregation, EncodedUpdate, NodeId, TaskId, UpdateMessage};
pub use transport::{ClipboardHandle, StorageHandle, Transport};
