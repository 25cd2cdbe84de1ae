//! The sending end of the framed protocol.

use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{
    Serialize,
    frame::{self, DEFAULT_MAX_FRAME_LEN, LEN_PREFIX_SIZE},
};

/// Writes serialized messages as length-prefixed frames.
///
/// The prefix and header go out from a reused buffer, the zero-copy tail a message may
/// return is written right after it without copying.
pub struct OnoSender<W: AsyncWrite + Unpin> {
    tx: W,
    buf: Vec<u8>,
    max_frame_len: usize,
}

impl<W: AsyncWrite + Unpin> OnoSender<W> {
    pub(super) fn new(tx: W) -> Self {
        Self {
            tx,
            buf: Vec::new(),
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }

    /// Sets the largest frame body this sender will write.
    pub fn with_max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.max_frame_len = max_frame_len;
        self
    }

    /// Writes `msg` as a single frame and flushes the writer.
    ///
    /// # Returns
    /// An `InvalidInput` error if the frame is above the limit, nothing is written then.
    pub async fn send<'a, T: Serialize<'a>>(&mut self, msg: &'a T) -> io::Result<()> {
        self.buf.clear();
        self.buf.extend_from_slice(&[0; LEN_PREFIX_SIZE]);

        let tail = msg.serialize(&mut self.buf).unwrap_or_default();
        let body_len = self.buf.len() - LEN_PREFIX_SIZE + tail.len();

        let prefix = frame::encode_len(body_len, self.max_frame_len)?;
        self.buf[..LEN_PREFIX_SIZE].copy_from_slice(&prefix);

        self.tx.write_all(&self.buf).await?;

        if !tail.is_empty() {
            self.tx.write_all(tail).await?;
        }

        self.tx.flush().await
    }

    /// Flushes and shuts down the inner writer, the peer reads the end of the stream
    /// right after the last complete frame.
    pub async fn close(&mut self) -> io::Result<()> {
        self.tx.shutdown().await
    }
}
