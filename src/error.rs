use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    /// A handle that was never issued or has already been released.
    InvalidHandle(u64),
    InvalidSeed(String),
    InvalidArgs(String),
    /// A known-answer or statistical self-test did not pass.
    SelfTest(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::InvalidHandle(id) => {
                write!(f, "invalid generator handle {} (unknown or released)", id)
            }
            Error::InvalidSeed(msg) => write!(f, "invalid seed: {}", msg),
            Error::InvalidArgs(msg) => write!(f, "invalid arguments: {}", msg),
            Error::SelfTest(msg) => write!(f, "self-test failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
