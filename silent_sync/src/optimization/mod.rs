mod elementwise;
mod gradient_descent;
mod step_function;

pub use elementwise::{AddStep, SubtractStep};
pub use gradient_descent::GradientDescent;
pub use step_function::StepFunction;

use ndarray::ArrayD;

use crate::error::ShapeMismatchErr;

/// Checks that `params` and `update` can be zipped together.
fn check_shapes(params: &ArrayD<f32>, update: &ArrayD<f32>) -> Result<(), ShapeMismatchErr> {
    if params.shape() != update.shape() {
        return Err(ShapeMismatchErr {
            expected: params.shape().to_vec(),
            got: update.shape().to_vec(),
        });
    }

    Ok(())
}
