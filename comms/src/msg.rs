use std::{borrow::Cow, io};

use crate::{Deserialize, Serialize};

type Header = u32;
const HEADER_SIZE: usize = size_of::<Header>();

type IdType = u64;
const ID_SIZE: usize = size_of::<IdType>();
const UPDATES_HEADER_SIZE: usize = 2 * ID_SIZE;

const ERR_KIND: Header = 0;
const CONTROL_KIND: Header = 1;
const UPDATES_KIND: Header = 2;

/// The payload data for the `Data` variant of the `Msg` enum.
#[derive(Debug, PartialEq, Eq)]
pub enum Payload<'a> {
    /// An encoded gradient update produced by the node `originator` while running `task`.
    Updates {
        originator: u64,
        task: u64,
        encoded: &'a [u8],
    },
}

/// The command for the `Control` variant of the `Msg` enum.
#[derive(Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Connect,
    JobFinished { originator: u64, task: u64 },
    Disconnect,
}

/// The application layer message for the entire system.
#[derive(Debug, PartialEq, Eq)]
pub enum Msg<'a> {
    Control(Command),
    Data(Payload<'a>),
    Err(Cow<'a, str>),
}

impl Msg<'_> {
    fn buf_is_too_small<T>(size: usize, needed: usize) -> io::Result<T> {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("The given buffer is too small {size}, must at least be {needed} bytes"),
        ))
    }

    fn invalid_kind_byte<T>(byte: Header) -> io::Result<T> {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Received an invalid kind byte {byte}"),
        ))
    }

    fn read_id(buf: &[u8]) -> IdType {
        let mut bytes = [0; ID_SIZE];
        bytes.copy_from_slice(&buf[..ID_SIZE]);
        IdType::from_be_bytes(bytes)
    }
}

impl<'a> Serialize<'a> for Msg<'a> {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]> {
        match self {
            Msg::Err(e) => {
                buf.extend_from_slice(&ERR_KIND.to_be_bytes());
                Some(e.as_bytes())
            }
            Msg::Control(cmd) => {
                buf.extend_from_slice(&CONTROL_KIND.to_be_bytes());

                // SAFETY: Serialize impl for `Command` is derived and not implemented
                //         by hand. Nor has a non string-key map inside.
                serde_json::to_writer(buf, &cmd).unwrap();
                None
            }
            Msg::Data(Payload::Updates {
                originator,
                task,
                encoded,
            }) => {
                buf.extend_from_slice(&UPDATES_KIND.to_be_bytes());
                buf.extend_from_slice(&originator.to_be_bytes());
                buf.extend_from_slice(&task.to_be_bytes());
                Some(encoded)
            }
        }
    }
}

impl<'a> Deserialize<'a> for Msg<'a> {
    fn deserialize(buf: &'a [u8]) -> io::Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Self::buf_is_too_small(buf.len(), HEADER_SIZE);
        }

        let (kind_buf, rest) = buf.split_at(HEADER_SIZE);

        let mut kind = [0; HEADER_SIZE];
        kind.copy_from_slice(kind_buf);

        match Header::from_be_bytes(kind) {
            ERR_KIND => {
                let string = std::str::from_utf8(rest)
                    .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

                Ok(Self::Err(Cow::Borrowed(string)))
            }
            CONTROL_KIND => {
                let cmd = serde_json::from_slice(rest)?;
                Ok(Self::Control(cmd))
            }
            UPDATES_KIND => {
                if rest.len() < UPDATES_HEADER_SIZE {
                    return Self::buf_is_too_small(buf.len(), HEADER_SIZE + UPDATES_HEADER_SIZE);
                }

                let (ids, encoded) = rest.split_at(UPDATES_HEADER_SIZE);
                let payload = Payload::Updates {
                    originator: Self::read_id(ids),
                    task: Self::read_id(&ids[ID_SIZE..]),
                    encoded,
                };

                Ok(Self::Data(payload))
            }
            kind => Self::invalid_kind_byte(kind),
        }
    }
}
