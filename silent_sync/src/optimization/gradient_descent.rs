use ndarray::{ArrayD, Zip};

use super::{StepFunction, check_shapes};
use crate::error::BoxedErr;

#[derive(Debug)]
pub struct GradientDescent {
    learning_rate: f32,
}

impl GradientDescent {
    /// Creates a new `GradientDescent` step function.
    ///
    /// # Arguments
    /// * `learning_rate` - The small coefficient that modulates the amount of training per update.
    ///
    /// # Returns
    /// A new `GradientDescent` instance.
    pub fn new(learning_rate: f32) -> Self {
        Self { learning_rate }
    }
}

impl StepFunction for GradientDescent {
    fn step(&mut self, params: &mut ArrayD<f32>, update: &ArrayD<f32>) -> Result<(), BoxedErr> {
        check_shapes(params, update)?;

        let lr = self.learning_rate;

        Zip::from(params)
            .and(update)
            .par_for_each(|p, &g| *p -= lr * g);

        Ok(())
    }
}
