use ndarray::{ArrayD, ShapeBuilder};

use crate::{
    error::{DriverErr, Result},
    optimization::StepFunction,
};

/// Applies the accumulated `updates` to `params` and zeroes `updates` right after.
///
/// Both halves always run together, an update left in the accumulator after being
/// applied would be applied again on the next cycle. If the step function fails the
/// accumulator is left as it was.
///
/// # Arguments
/// * `params` - The live parameters.
/// * `updates` - The accumulated, not yet applied, updates.
/// * `step` - The step function moving the parameters.
///
/// # Returns
/// A `DriverErr::Step` error if the step function failed.
pub fn apply_and_reset(
    params: &mut ArrayD<f32>,
    updates: &mut ArrayD<f32>,
    step: &mut dyn StepFunction,
) -> Result<()> {
    step.step(params, updates).map_err(DriverErr::Step)?;
    updates.fill(0.);
    Ok(())
}

/// Allocates a zeroed tensor with the same shape and memory order as `params`.
pub fn zeros_like(params: &ArrayD<f32>) -> ArrayD<f32> {
    let shape = params.raw_dim();

    if !params.is_standard_layout() && params.t().is_standard_layout() {
        ArrayD::zeros(shape.f())
    } else {
        ArrayD::zeros(shape)
    }
}
