/// Errors returned by the [`crate::SortEngine`] and the input parsing helpers
#[derive(Debug)]
pub enum Error {
    /// A run is already in progress, the engine state was left untouched
    AlreadyRunning,
    /// Supplied values or arguments were rejected
    InvalidInput(String),
    /// The worker thread could not be spawned
    Spawn(std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyRunning => {
                f.write_str("a sort is already running, cancel it or wait for it to finish")
            }
            Self::InvalidInput(reason) => write!(f, "invalid input: {reason}"),
            Self::Spawn(err) => write!(f, "failed to spawn sort worker: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(err) => Some(err),
            _ => None,
        }
    }
}
