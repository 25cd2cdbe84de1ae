use ndarray::{ArrayD, Zip};

use super::{StepFunction, check_shapes};
use crate::error::BoxedErr;

/// Adds the update to the parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct AddStep;

/// Subtracts the update from the parameters, a plain negative gradient step.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubtractStep;

impl StepFunction for AddStep {
    fn step(&mut self, params: &mut ArrayD<f32>, update: &ArrayD<f32>) -> Result<(), BoxedErr> {
        check_shapes(params, update)?;

        Zip::from(params)
            .and(update)
            .par_for_each(|p, &u| *p += u);

        Ok(())
    }
}

impl StepFunction for SubtractStep {
    fn step(&mut self, params: &mut ArrayD<f32>, update: &ArrayD<f32>) -> Result<(), BoxedErr> {
        check_shapes(params, update)?;

        Zip::from(params)
            .and(update)
            .par_for_each(|p, &u| *p -= u);

        Ok(())
    }
}
