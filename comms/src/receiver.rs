//! The receiving end of the framed protocol.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{
    Deserialize,
    frame::{self, DEFAULT_MAX_FRAME_LEN, LEN_PREFIX_SIZE},
};

/// Reads length-prefixed frames and deserializes messages out of them.
pub struct OnoReceiver<R: AsyncRead + Unpin> {
    rx: R,
    buf: Vec<u8>,
    max_frame_len: usize,
}

impl<R: AsyncRead + Unpin> OnoReceiver<R> {
    pub(super) fn new(rx: R) -> Self {
        Self {
            rx,
            buf: Vec::new(),
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }

    /// Sets the largest frame body this receiver will accept.
    pub fn with_max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.max_frame_len = max_frame_len;
        self
    }

    /// Waits to receive a new message from the inner receiver.
    ///
    /// The frame is read into a buffer owned by the receiver and reused between calls,
    /// the returned `T` borrows from it until the next call.
    ///
    /// # Returns
    /// The message, or an `InvalidData` error if the announced frame length is above the
    /// limit. The body isn't read then, so the stream can't be used afterwards.
    pub async fn recv<'a, T: Deserialize<'a>>(&'a mut self) -> io::Result<T> {
        let mut prefix = [0; LEN_PREFIX_SIZE];
        self.rx.read_exact(&mut prefix).await?;
        let len = frame::decode_len(prefix, self.max_frame_len)?;

        self.buf.clear();
        self.buf.resize(len, 0);
        self.rx.read_exact(&mut self.buf).await?;

        T::deserialize(&self.buf)
    }
}
