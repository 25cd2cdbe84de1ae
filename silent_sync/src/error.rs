use std::{error::Error, fmt, io};

/// The crate's result type.
pub type Result<T> = std::result::Result<T, DriverErr>;

/// Type-erased failure reported by an external collaborator (codec or step function).
pub type BoxedErr = Box<dyn Error + Send + Sync>;

/// Invalid driver configuration, there's no protocol role that can be executed with it.
#[derive(Debug)]
pub enum ConfigErr {
    /// Neither a worker update buffer nor a master parameter set was supplied.
    MissingRole,
    /// Both the worker and the master fields were supplied.
    ConflictingRoles,
    /// The master role is missing one of its required fields.
    IncompleteMaster { missing: &'static str },
    /// A cluster configuration document couldn't be parsed.
    Malformed(serde_json::Error),
}

impl fmt::Display for ConfigErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigErr::MissingRole => {
                f.write_str("neither an update buffer nor a step function is defined")
            }
            ConfigErr::ConflictingRoles => {
                f.write_str("a driver can't be configured as both master and worker")
            }
            ConfigErr::IncompleteMaster { missing } => {
                write!(f, "master role requires a {missing}")
            }
            ConfigErr::Malformed(e) => write!(f, "malformed cluster configuration: {e}"),
        }
    }
}

impl Error for ConfigErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigErr::Malformed(e) => Some(e),
            _ => None,
        }
    }
}

/// Error returned by the built-in step functions whenever the parameters and the
/// update don't share the same shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMismatchErr {
    pub expected: Vec<usize>,
    pub got: Vec<usize>,
}

impl fmt::Display for ShapeMismatchErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shape mismatch: expected {:?}, got {:?}",
            self.expected, self.got
        )
    }
}

impl Error for ShapeMismatchErr {}

/// Training driver failures.
#[derive(Debug)]
pub enum DriverErr {
    Config(ConfigErr),
    NotInitialized,
    AlreadyInitialized,
    Decode(BoxedErr),
    Step(BoxedErr),
    BufferClosed,
    Transport(io::Error),
}

impl fmt::Display for DriverErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverErr::Config(e) => write!(f, "invalid configuration: {e}"),
            DriverErr::NotInitialized => f.write_str("driver used before init"),
            DriverErr::AlreadyInitialized => f.write_str("driver initialized twice"),
            DriverErr::Decode(e) => write!(f, "failed to decode updates: {e}"),
            DriverErr::Step(e) => write!(f, "failed to apply updates: {e}"),
            DriverErr::BufferClosed => f.write_str("update buffer is closed"),
            DriverErr::Transport(e) => write!(f, "transport error: {e}"),
        }
    }
}

impl Error for DriverErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DriverErr::Config(e) => Some(e),
            DriverErr::Decode(e) | DriverErr::Step(e) => Some(e.as_ref()),
            DriverErr::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigErr> for DriverErr {
    fn from(value: ConfigErr) -> Self {
        Self::Config(value)
    }
}

impl From<io::Error> for DriverErr {
    fn from(value: io::Error) -> Self {
        Self::Transport(value)
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<DriverErr> for io::Error {
    fn from(value: DriverErr) -> Self {
        match value {
            DriverErr::Transport(e) => e,
            other => io::Error::other(other),
        }
    }
}
