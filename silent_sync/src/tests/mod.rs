//! Test doubles for the driver's collaborators.

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use ndarray::ArrayD;
use parking_lot::Mutex;

use crate::{
    ClusterConfig, NodeId, SilentTrainingDriver, TaskId, ThresholdCodec, Transport, TrainingDriver,
    UpdateMessage,
    error::BoxedErr,
    optimization::{AddStep, StepFunction},
};

/// A transport that records every re-broadcast instead of sending it.
pub struct MockTransport {
    own_id: NodeId,
    clients: AtomicUsize,
    sent: Mutex<Vec<(UpdateMessage, Vec<NodeId>)>>,
}

impl MockTransport {
    pub fn new(own_id: u64, clients: usize) -> Arc<Self> {
        Arc::new(Self {
            own_id: NodeId(own_id),
            clients: AtomicUsize::new(clients),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn set_clients(&self, clients: usize) {
        self.clients.store(clients, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(UpdateMessage, Vec<NodeId>)> {
        self.sent.lock().clone()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    fn own_id(&self) -> NodeId {
        self.own_id
    }

    fn number_of_known_clients(&self) -> usize {
        self.clients.load(Ordering::SeqCst)
    }

    async fn send_to_all_except(
        &self,
        message: &UpdateMessage,
        excluded: &[NodeId],
    ) -> io::Result<()> {
        self.sent.lock().push((message.clone(), excluded.to_vec()));
        Ok(())
    }
}

/// A codec whose payload is the dense update as little endian floats.
pub struct DenseCodec;

impl ThresholdCodec for DenseCodec {
    fn decode(&self, encoded: &[u8], destination: &mut ArrayD<f32>) -> Result<(), BoxedErr> {
        if encoded.len() != destination.len() * size_of::<f32>() {
            return Err("payload doesn't match the destination size".into());
        }

        let values = encoded
            .chunks_exact(size_of::<f32>())
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]));

        destination
            .iter_mut()
            .zip(values)
            .for_each(|(d, v)| *d += v);

        Ok(())
    }
}

pub fn encode(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// An `AddStep` that counts how many times it was invoked.
pub struct CountingStep(pub Arc<AtomicUsize>);

impl StepFunction for CountingStep {
    fn step(&mut self, params: &mut ArrayD<f32>, update: &ArrayD<f32>) -> Result<(), BoxedErr> {
        self.0.fetch_add(1, Ordering::SeqCst);
        AddStep.step(params, update)
    }
}

pub fn update(originator: u64, values: &[f32]) -> UpdateMessage {
    UpdateMessage::new(NodeId(originator), TaskId(0), encode(values))
}

pub fn bind(driver: &SilentTrainingDriver, transport: &Arc<MockTransport>) {
    driver
        .init(ClusterConfig::default(), transport.clone(), None, None)
        .unwrap();
}
