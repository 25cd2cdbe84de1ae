//! Framed application protocol between cluster nodes.
//!
//! Every frame is an 8 byte big endian length followed by that many bytes of body, the
//! body of a `msg::Msg` starts with a 4 byte kind header. Both ends refuse frames longer
//! than their configured limit, `DEFAULT_MAX_FRAME_LEN` unless changed.

mod deserialize;
mod frame;
pub mod msg;
mod receiver;
mod sender;
mod serialize;

use tokio::io::{AsyncRead, AsyncWrite};

pub use deserialize::Deserialize;
pub use frame::DEFAULT_MAX_FRAME_LEN;
pub use receiver::OnoReceiver;
pub use sender::OnoSender;
pub use serialize::Serialize;

/// Splits a connection into its framed receiving and sending ends.
///
/// # Arguments
/// * `rx` - The readable half of the connection.
/// * `tx` - The writable half of the connection.
///
/// # Returns
/// The `OnoReceiver` and `OnoSender` wrapping each half, with the default frame limit.
pub fn channel<R, W>(rx: R, tx: W) -> (OnoReceiver<R>, OnoSender<W>)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    (OnoReceiver::new(rx), OnoSender::new(tx))
}
