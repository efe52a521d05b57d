//! Self-adjusting binary search tree over borrowed values. Every insertion and every successful
//! lookup moves the accessed node to the root.

mod node;
mod set;
mod tree;

pub use self::set::{Iter, SplayTree};
pub use crate::arena::Entry as Handle;

use std::collections::TryReserveError;
use std::error;
use std::fmt;
use std::result;

const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Construction parameters for a `SplayTree`.
///
/// # Examples
///
/// ```
/// use splay_collections::splay_tree::Config;
///
/// let config = Config::default().chunk_size(64).verify_invariants(true);
/// assert_eq!(config.get_chunk_size(), 64);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    chunk_size: usize,
    verify_invariants: bool,
}

impl Config {
    /// Sets the number of nodes allocated per arena chunk.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// When set, every deletion validates the whole tree afterwards and panics on a violation.
    pub fn verify_invariants(mut self, verify_invariants: bool) -> Self {
        self.verify_invariants = verify_invariants;
        self
    }

    pub fn get_chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn get_verify_invariants(&self) -> bool {
        self.verify_invariants
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chunk_size: DEFAULT_CHUNK_SIZE,
            verify_invariants: false,
        }
    }
}

#[derive(Debug)]
pub enum Error {
    /// A node could not be allocated.
    AllocationFailed(TryReserveError),
    RootHasParent,
    /// A child does not point back at its parent, or a link names a freed node.
    BrokenParentLink,
    /// A value lies outside the range allowed by its ancestors.
    OutOfOrder,
    SizeMismatch { expected: usize, reachable: usize },
}

impl From<TryReserveError> for Error {
    fn from(err: TryReserveError) -> Error {
        Error::AllocationFailed(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::AllocationFailed(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::AllocationFailed(error) => write!(f, "node allocation failed: {}", error),
            Error::RootHasParent => write!(f, "root node has a parent"),
            Error::BrokenParentLink => write!(f, "child node does not link back to its parent"),
            Error::OutOfOrder => write!(f, "value is out of order with respect to an ancestor"),
            Error::SizeMismatch {
                expected,
                reachable,
            } => write!(
                f,
                "tree records {} nodes but {} are reachable",
                expected, reachable
            ),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::{Config, Error};

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.get_chunk_size(), 1024);
        assert!(!config.get_verify_invariants());
    }

    #[test]
    fn test_error_display() {
        let error = Error::SizeMismatch {
            expected: 3,
            reachable: 2,
        };
        assert_eq!(error.to_string(), "tree records 3 nodes but 2 are reachable");
        assert_eq!(Error::OutOfOrder.to_string(), "value is out of order with respect to an ancestor");
    }

    #[test]
    fn test_allocation_error_source() {
        use std::error::Error as StdError;

        let reserve_error = Vec::<u64>::new().try_reserve(usize::max_value()).unwrap_err();
        let error = Error::from(reserve_error);
        assert!(error.source().is_some());
        assert!(error.to_string().starts_with("node allocation failed"));
    }
}
