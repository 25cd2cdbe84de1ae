use std::io;

/// Reads a value out of a frame body, possibly borrowing from it.
pub trait Deserialize<'a>: Sized {
    fn deserialize(buf: &'a [u8]) -> io::Result<Self>;
}
