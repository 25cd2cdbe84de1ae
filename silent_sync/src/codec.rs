use ndarray::ArrayD;

use crate::error::BoxedErr;

/// Decompresses sparse or quantized gradient updates.
pub trait ThresholdCodec: Send {
    /// Decodes `encoded` into `destination`, adding to what it already holds.
    ///
    /// Calling this repeatedly between resets of `destination` must accumulate the
    /// decoded updates, never overwrite them.
    ///
    /// A failed decode must leave `destination` exactly as it was. The caller doesn't
    /// count a failed update as pending, so anything written before failing would be
    /// folded unnoticed into the next apply or lost at the end of the job.
    ///
    /// # Arguments
    /// * `encoded` - The compressed update.
    /// * `destination` - The dense tensor to accumulate into.
    ///
    /// # Returns
    /// An error if `encoded` is corrupt or doesn't fit `destination`.
    fn decode(&self, encoded: &[u8], destination: &mut ArrayD<f32>) -> Result<(), BoxedErr>;
}
