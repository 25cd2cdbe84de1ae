/// Writes a value into a frame body.
pub trait Serialize<'a> {
    /// Serializes `self` into `buf`.
    ///
    /// Implementors may leave a tail of bytes out of `buf` and return it instead, the
    /// sender will write it right after the buffer without copying it.
    ///
    /// # Arguments
    /// * `buf` - The frame buffer to extend.
    ///
    /// # Returns
    /// The zero-copy tail of the frame, if any.
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]>;
}
