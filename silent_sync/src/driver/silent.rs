use std::sync::{
    Arc, OnceLock,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use log::{debug, info, trace};
use ndarray::ArrayD;
use parking_lot::Mutex;

use super::TrainingDriver;
use crate::{
    applier::{apply_and_reset, zeros_like},
    buffer::UpdateBuffer,
    codec::ThresholdCodec,
    config::ClusterConfig,
    error::{DriverErr, Result},
    message::{Aggregation, EncodedUpdate, NodeId, TaskId, UpdateMessage},
    optimization::StepFunction,
    transport::{ClipboardHandle, StorageHandle, Transport},
};

/// The lifecycle of a driver, it never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Uninitialized,
    Initialized,
    Active,
}

/// What `init` binds the driver to.
struct Binding {
    config: ClusterConfig,
    transport: Arc<dyn Transport>,
}

/// Everything mutated by the master's critical section.
struct Tensors {
    params: ArrayD<f32>,
    updates: ArrayD<f32>,
    step: Box<dyn StepFunction>,
    codec: Box<dyn ThresholdCodec>,
}

pub(super) struct Master {
    tensors: Mutex<Tensors>,
    has_something: AtomicBool,
}

pub(super) enum Role {
    Master(Master),
    Worker(UpdateBuffer<EncodedUpdate>),
}

/// A training driver for silent gradient sharing.
///
/// On the master every incoming update is decoded into an accumulator, applied to the
/// parameters once every `max(known clients, apply floor)` updates, and echoed to every
/// other client. On workers incoming updates are only buffered for the local gradient
/// accumulator, nothing gets applied here.
pub struct SilentTrainingDriver {
    role: Role,
    binding: OnceLock<Binding>,
    active: AtomicBool,
    updates_count: AtomicU64,
}

impl SilentTrainingDriver {
    pub(super) fn master(
        params: ArrayD<f32>,
        step: Box<dyn StepFunction>,
        codec: Box<dyn ThresholdCodec>,
    ) -> Self {
        info!(params = params.len(); "creating training driver for master");

        // updates are always the same shape as params
        let updates = zeros_like(&params);

        let master = Master {
            tensors: Mutex::new(Tensors {
                params,
                updates,
                step,
                codec,
            }),
            has_something: AtomicBool::new(false),
        };

        Self::with_role(Role::Master(master))
    }

    pub(super) fn worker(buffer: UpdateBuffer<EncodedUpdate>) -> Self {
        info!(capacity = buffer.capacity(); "creating training driver for worker");
        Self::with_role(Role::Worker(buffer))
    }

    fn with_role(role: Role) -> Self {
        Self {
            role,
            binding: OnceLock::new(),
            active: AtomicBool::new(false),
            updates_count: AtomicU64::new(0),
        }
    }

    /// Returns a handle to the update buffer so the gradient accumulator can consume it.
    ///
    /// # Returns
    /// `None` on the master, it never buffers anything.
    pub fn update_buffer(&self) -> Option<UpdateBuffer<EncodedUpdate>> {
        match &self.role {
            Role::Worker(buffer) => Some(buffer.clone()),
            Role::Master(_) => None,
        }
    }

    pub fn is_master(&self) -> bool {
        matches!(self.role, Role::Master(_))
    }

    pub fn state(&self) -> DriverState {
        if self.active.load(Ordering::Acquire) {
            DriverState::Active
        } else if self.binding.get().is_some() {
            DriverState::Initialized
        } else {
            DriverState::Uninitialized
        }
    }

    /// Returns the amount of updates accepted so far.
    pub fn updates_count(&self) -> u64 {
        self.updates_count.load(Ordering::Acquire)
    }

    /// Returns whether the master holds accumulated updates that weren't applied yet.
    pub fn has_pending(&self) -> bool {
        match &self.role {
            Role::Master(master) => master.has_something.load(Ordering::Acquire),
            Role::Worker(_) => false,
        }
    }

    /// Copies the current parameters, only the master holds them.
    pub fn snapshot_params(&self) -> Option<ArrayD<f32>> {
        match &self.role {
            Role::Master(master) => Some(master.tensors.lock().params.clone()),
            Role::Worker(_) => None,
        }
    }

    /// Entry point for every incoming `UpdateMessage`, applies or buffers it.
    pub async fn on_update_message(&self, message: UpdateMessage) -> Result<()> {
        self.start_training(message).await
    }

    /// Entry point for the end of the job, flushes whatever the master didn't apply yet.
    pub fn on_job_finished(&self, originator_id: NodeId, task_id: TaskId) -> Result<()> {
        self.finish_training(originator_id, task_id)
    }

    fn binding(&self) -> Result<&Binding> {
        self.binding.get().ok_or(DriverErr::NotInitialized)
    }

    /// Puts an update coming from another node into the worker's buffer.
    ///
    /// If the buffer is full this waits, and while it waits no other message is taken
    /// from this connection. Peers retransmit periodically so nothing needs to be
    /// dropped here.
    async fn store(
        &self,
        buffer: &UpdateBuffer<EncodedUpdate>,
        binding: &Binding,
        message: UpdateMessage,
    ) -> Result<()> {
        let originator = message.originator_id();

        if originator == binding.transport.own_id() {
            trace!(originator = originator.0; "skipping self-originated update");
            return Ok(());
        }

        debug!(originator = originator.0, task = message.task_id().0; "storing external update");

        buffer.put(message.into_updates()).await?;
        self.updates_count.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Decodes `message` into the accumulator and applies the accumulator when it's time to.
    ///
    /// This is the master's only critical section, concurrent messages serialize here.
    fn accumulate(
        &self,
        master: &Master,
        binding: &Binding,
        message: &UpdateMessage,
    ) -> Result<()> {
        let mut tensors = master.tensors.lock();
        let Tensors {
            params,
            updates,
            step,
            codec,
        } = &mut *tensors;

        codec
            .decode(message.updates(), updates)
            .map_err(DriverErr::Decode)?;

        master.has_something.store(true, Ordering::Release);

        let count = self.updates_count.fetch_add(1, Ordering::AcqRel) + 1;
        let every = binding
            .config
            .apply_every(binding.transport.number_of_known_clients());

        if count % every == 0 {
            apply_and_reset(params, updates, &mut **step)?;
            master.has_something.store(false, Ordering::Release);
            debug!(count = count, every = every; "applied accumulated updates");
        }

        Ok(())
    }

    /// Echoes `message` to everyone but its originator and this node.
    async fn rebroadcast(&self, binding: &Binding, message: &UpdateMessage) -> Result<()> {
        let transport = &binding.transport;

        // with a single client there's nobody else to tell
        if transport.number_of_known_clients() <= 1 {
            return Ok(());
        }

        let excluded = [message.originator_id(), transport.own_id()];
        transport.send_to_all_except(message, &excluded).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TrainingDriver<UpdateMessage> for SilentTrainingDriver {
    fn init(
        &self,
        config: ClusterConfig,
        transport: Arc<dyn Transport>,
        _storage: Option<StorageHandle>,
        _clipboard: Option<ClipboardHandle>,
    ) -> Result<()> {
        let own_id = transport.own_id();

        self.binding
            .set(Binding { config, transport })
            .map_err(|_| DriverErr::AlreadyInitialized)?;

        debug!(own_id = own_id.0; "training driver initialized");
        Ok(())
    }

    async fn start_training(&self, message: UpdateMessage) -> Result<()> {
        let binding = self.binding()?;

        match &self.role {
            Role::Worker(buffer) => self.store(buffer, binding, message).await?,
            Role::Master(master) => {
                self.accumulate(master, binding, &message)?;
                self.active.store(true, Ordering::Release);
                self.rebroadcast(binding, &message).await?;
            }
        }

        self.active.store(true, Ordering::Release);
        Ok(())
    }

    fn pick_training(&self, _message: &UpdateMessage) {}

    fn aggregation_finished(&self, _aggregation: &Aggregation) {}

    fn finish_training(&self, originator_id: NodeId, task_id: TaskId) -> Result<()> {
        let Role::Master(master) = &self.role else {
            return Ok(());
        };

        let mut tensors = master.tensors.lock();

        if master.has_something.load(Ordering::Acquire) {
            let Tensors {
                params,
                updates,
                step,
                ..
            } = &mut *tensors;

            apply_and_reset(params, updates, &mut **step)?;
            master.has_something.store(false, Ordering::Release);

            info!(originator = originator_id.0, task = task_id.0; "applied final updates");
        }

        Ok(())
    }

    fn add_completion_hook(&self, _originator_id: NodeId, _frame_id: u64, _message_id: u64) {}

    fn target_message_class(&self) -> &'static str {
        UpdateMessage::CLASS
    }
}
