//! The length prefix every frame starts with.

use std::io;

type LenType = u64;

/// Size in bytes of the length prefix.
pub(crate) const LEN_PREFIX_SIZE: usize = size_of::<LenType>();

/// The largest frame body accepted by default, in bytes.
pub const DEFAULT_MAX_FRAME_LEN: usize = 256 * 1024 * 1024;

/// Encodes the length prefix of a frame with a `len` bytes long body.
///
/// # Returns
/// An `InvalidInput` error if `len` is above `max`.
pub(crate) fn encode_len(len: usize, max: usize) -> io::Result<[u8; LEN_PREFIX_SIZE]> {
    if len > max {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Frame of {len} bytes exceeds the limit of {max} bytes"),
        ));
    }

    Ok((len as LenType).to_be_bytes())
}

/// Decodes a length prefix read from the wire.
///
/// # Returns
/// An `InvalidData` error if the announced length is above `max` or doesn't fit in memory.
pub(crate) fn decode_len(prefix: [u8; LEN_PREFIX_SIZE], max: usize) -> io::Result<usize> {
    let announced = LenType::from_be_bytes(prefix);

    match usize::try_from(announced) {
        Ok(len) if len <= max => Ok(len),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Received a frame length of {announced} bytes, the limit is {max} bytes"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_prefix_is_big_endian() {
        let prefix = encode_len(258, DEFAULT_MAX_FRAME_LEN).unwrap();
        assert_eq!(prefix, [0, 0, 0, 0, 0, 0, 1, 2]);
        assert_eq!(decode_len(prefix, DEFAULT_MAX_FRAME_LEN).unwrap(), 258);
    }

    #[test]
    fn test_rejects_lengths_above_limit() {
        let err = encode_len(11, 10).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        let err = decode_len(11u64.to_be_bytes(), 10).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let err = decode_len(u64::MAX.to_be_bytes(), DEFAULT_MAX_FRAME_LEN).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
