use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by a driver or by code built on top of it.
///
/// None of these are retryable: initialization and resource errors abort
/// startup, driver errors end the running game loop.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not initialize {subsystem}: {message}")]
    Initialization {
        subsystem: &'static str,
        message: String,
    },
    #[error("could not load {}: {message}", .path.display())]
    ResourceLoad { path: PathBuf, message: String },
    #[error("could not {operation}: {message}")]
    Driver {
        operation: &'static str,
        message: String,
    },
}

impl Error {
    pub fn initialization(subsystem: &'static str, message: impl ToString) -> Self {
        Error::Initialization {
            subsystem,
            message: message.to_string(),
        }
    }

    pub fn resource_load(path: &Path, message: impl ToString) -> Self {
        Error::ResourceLoad {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn driver(operation: &'static str, message: impl ToString) -> Self {
        Error::Driver {
            operation,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = Error::resource_load(Path::new("res/imgs/pipe.bmp"), "file not found");
        assert_eq!(
            err.to_string(),
            "could not load res/imgs/pipe.bmp: file not found"
        );

        let err = Error::driver("copy texture", "invalid texture");
        assert_eq!(err.to_string(), "could not copy texture: invalid texture");

        let err = Error::initialization("TTF", "no library");
        assert_eq!(err.to_string(), "could not initialize TTF: no library");
    }
}
