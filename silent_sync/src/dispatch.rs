use std::{collections::HashMap, io, ops::ControlFlow, sync::Arc};

use comms::{
    OnoReceiver,
    msg::{Command, Msg, Payload},
};
use log::{debug, info, warn};
use tokio::io::AsyncRead;

use crate::{
    driver::TrainingDriver,
    error::Result,
    message::{NodeId, TaskId, UpdateMessage},
};

type SharedDriver = Arc<dyn TrainingDriver<UpdateMessage>>;

/// Routes incoming wire messages to the driver registered for their class.
#[derive(Default)]
pub struct Dispatcher {
    drivers: HashMap<&'static str, SharedDriver>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `driver` for the class it targets.
    ///
    /// # Returns
    /// The driver previously registered for that class, if any.
    pub fn register(&mut self, driver: SharedDriver) -> Option<SharedDriver> {
        self.drivers.insert(driver.target_message_class(), driver)
    }

    pub fn driver(&self, class: &str) -> Option<&SharedDriver> {
        self.drivers.get(class)
    }

    /// Reads and dispatches messages from `rx` until a disconnect arrives or the
    /// connection is closed between two frames.
    ///
    /// # Arguments
    /// * `rx` - The receiving end of the connection.
    ///
    /// # Returns
    /// The first error raised by the connection or by a driver.
    pub async fn serve<R: AsyncRead + Unpin>(&self, rx: &mut OnoReceiver<R>) -> Result<()> {
        loop {
            let msg: Msg = match rx.recv().await {
                Ok(msg) => msg,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    info!("connection closed");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };

            if self.dispatch(msg).await?.is_break() {
                return Ok(());
            }
        }
    }

    /// Hands a single message to the drivers.
    ///
    /// # Returns
    /// `ControlFlow::Break` once the peer asked to disconnect.
    pub async fn dispatch(&self, msg: Msg<'_>) -> Result<ControlFlow<()>> {
        match msg {
            Msg::Data(Payload::Updates {
                originator,
                task,
                encoded,
            }) => {
                let Some(driver) = self.drivers.get(UpdateMessage::CLASS) else {
                    warn!(originator = originator; "no driver registered for updates, skipping");
                    return Ok(ControlFlow::Continue(()));
                };

                let message = UpdateMessage::new(NodeId(originator), TaskId(task), encoded);
                driver.start_training(message).await?;
            }
            Msg::Control(Command::JobFinished { originator, task }) => {
                debug!(originator = originator, task = task; "job finished");

                for driver in self.drivers.values() {
                    driver.finish_training(NodeId(originator), TaskId(task))?;
                }
            }
            Msg::Control(Command::Connect) => debug!("peer connected"),
            Msg::Control(Command::Disconnect) => {
                info!("disconnect received");
                return Ok(ControlFlow::Break(()));
            }
            Msg::Err(detail) => warn!("peer reported an error: {detail}"),
        }

        Ok(ControlFlow::Continue(()))
    }
}
