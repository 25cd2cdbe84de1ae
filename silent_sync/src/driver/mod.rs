mod builder;
mod silent;
mod training_driver;

pub use builder::DriverBuilder;
pub use silent::{DriverState, SilentTrainingDriver};
pub use training_driver::TrainingDriver;
