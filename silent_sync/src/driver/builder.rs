use std::num::NonZeroUsize;

use ndarray::ArrayD;

use super::SilentTrainingDriver;
use crate::{
    buffer::{DEFAULT_BUFFER_CAPACITY, UpdateBuffer},
    codec::ThresholdCodec,
    error::{ConfigErr, Result},
    optimization::StepFunction,
};

/// Builds `SilentTrainingDriver`s, choosing the role from the supplied fields.
///
/// A master needs the parameters, a step function and a codec. A worker only needs an
/// update buffer. Anything else doesn't describe a role and fails to build.
#[derive(Default)]
pub struct DriverBuilder {
    params: Option<ArrayD<f32>>,
    step_function: Option<Box<dyn StepFunction>>,
    codec: Option<Box<dyn ThresholdCodec>>,
    buffer_capacity: Option<NonZeroUsize>,
}

impl DriverBuilder {
    /// Creates a new `DriverBuilder` with no role fields set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the live parameters the master will own.
    pub fn params(mut self, params: ArrayD<f32>) -> Self {
        self.params = Some(params);
        self
    }

    /// Sets the step function the master applies accumulated updates with.
    pub fn step_function<S: StepFunction + 'static>(mut self, step: S) -> Self {
        self.step_function = Some(Box::new(step));
        self
    }

    /// Sets the codec the master decodes incoming updates with.
    pub fn codec<C: ThresholdCodec + 'static>(mut self, codec: C) -> Self {
        self.codec = Some(Box::new(codec));
        self
    }

    /// Makes the driver a worker buffering up to `capacity` updates.
    pub fn update_buffer(mut self, capacity: NonZeroUsize) -> Self {
        self.buffer_capacity = Some(capacity);
        self
    }

    /// Makes the driver a worker with the default buffer capacity.
    pub fn worker(self) -> Self {
        self.update_buffer(DEFAULT_BUFFER_CAPACITY)
    }

    /// Builds the driver.
    ///
    /// # Returns
    /// The new driver, or a `ConfigErr` if the fields set don't describe exactly one role.
    pub fn build(self) -> Result<SilentTrainingDriver> {
        let Self {
            params,
            step_function,
            codec,
            buffer_capacity,
        } = self;

        let any_master_field = params.is_some() || step_function.is_some() || codec.is_some();

        match (buffer_capacity, any_master_field) {
            (Some(_), true) => Err(ConfigErr::ConflictingRoles.into()),
            (Some(capacity), false) => {
                let buffer = UpdateBuffer::new(capacity);
                Ok(SilentTrainingDriver::worker(buffer))
            }
            (None, false) => Err(ConfigErr::MissingRole.into()),
            (None, true) => {
                let params = params.ok_or(ConfigErr::IncompleteMaster {
                    missing: "parameter tensor",
                })?;
                let step = step_function.ok_or(ConfigErr::IncompleteMaster {
                    missing: "step function",
                })?;
                let codec = codec.ok_or(ConfigErr::IncompleteMaster { missing: "codec" })?;

                Ok(SilentTrainingDriver::master(params, step, codec))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{ArrayD, IxDyn};

    use super::*;
    use crate::{DriverErr, optimization::AddStep, tests::DenseCodec};

    fn params() -> ArrayD<f32> {
        ArrayD::zeros(IxDyn(&[4]))
    }

    #[test]
    fn test_no_role_is_a_config_error() {
        let err = DriverBuilder::new().build().err().unwrap();
        assert!(matches!(err, DriverErr::Config(ConfigErr::MissingRole)));
    }

    #[test]
    fn test_both_roles_is_a_config_error() {
        let err = DriverBuilder::new()
            .params(params())
            .step_function(AddStep)
            .codec(DenseCodec)
            .worker()
            .build()
            .err()
            .unwrap();

        assert!(matches!(err, DriverErr::Config(ConfigErr::ConflictingRoles)));
    }

    #[test]
    fn test_incomplete_master_is_a_config_error() {
        let err = DriverBuilder::new()
            .params(params())
            .codec(DenseCodec)
            .build()
            .err()
            .unwrap();

        assert!(matches!(
            err,
            DriverErr::Config(ConfigErr::IncompleteMaster {
                missing: "step function"
            })
        ));

        let err = DriverBuilder::new()
            .step_function(AddStep)
            .codec(DenseCodec)
            .build()
            .err()
            .unwrap();

        assert!(matches!(
            err,
            DriverErr::Config(ConfigErr::IncompleteMaster {
                missing: "parameter tensor"
            })
        ));
    }

    #[test]
    fn test_worker_defaults() {
        let driver = DriverBuilder::new().worker().build().unwrap();

        assert!(!driver.is_master());
        assert!(driver.snapshot_params().is_none());

        let buffer = driver.update_buffer().unwrap();
        assert_eq!(buffer.capacity(), 1024);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_master_owns_params() {
        let driver = DriverBuilder::new()
            .params(params())
            .step_function(AddStep)
            .codec(DenseCodec)
            .build()
            .unwrap();

        assert!(driver.is_master());
        assert!(driver.update_buffer().is_none());
        assert_eq!(driver.snapshot_params().unwrap(), params());
    }
}
