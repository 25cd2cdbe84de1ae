use ndarray::ArrayD;

use crate::error::BoxedErr;

/// Defines how an accumulated update moves the model parameters.
pub trait StepFunction: Send {
    /// Applies `update` to `params` in place.
    ///
    /// # Arguments
    /// * `params` - The parameters to update.
    /// * `update` - The accumulated update.
    ///
    /// # Returns
    /// An error if the update can't be applied, `params` must be left untouched then.
    fn step(&mut self, params: &mut ArrayD<f32>, update: &ArrayD<f32>) -> Result<(), BoxedErr>;
}

impl<F> StepFunction for F
where
    F: FnMut(&mut ArrayD<f32>, &ArrayD<f32>) -> Result<(), BoxedErr> + Send,
{
    fn step(&mut self, params: &mut ArrayD<f32>, update: &ArrayD<f32>) -> Result<(), BoxedErr> {
        self(params, update)
    }
}
