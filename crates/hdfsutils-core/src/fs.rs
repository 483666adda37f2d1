//! The remote filesystem contract.

use crate::error::{FsError, Result};
use crate::node::Node;

/// Minimal set of remote calls the move and find engines rely on.
///
/// Every call is blocking and issued one at a time. Implementations translate
/// their transport failures into [`FsError`] kinds; absence must be reported as
/// [`FsError::NotFound`] so that [`FileSystem::try_stat`] can tell it apart.
pub trait FileSystem {
    /// Status of `path`. Fails with `NotFound` if it does not exist.
    fn stat(&self, path: &str) -> Result<Node>;

    /// Status of `path`, or `None` if it does not exist.
    fn try_stat(&self, path: &str) -> Result<Option<Node>> {
        match self.stat(path) {
            Ok(node) => Ok(Some(node)),
            Err(FsError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Immediate children of the directory at `path`, in server order.
    fn list(&self, path: &str) -> Result<Vec<Node>>;

    /// Rename `source` to `target`. The target must not exist.
    fn rename(&self, source: &str, target: &str) -> Result<()>;

    /// Delete `path` and everything below it.
    fn delete(&self, path: &str) -> Result<()>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn stat(&self, path: &str) -> Result<Node> {
        (**self).stat(path)
    }

    fn try_stat(&self, path: &str) -> Result<Option<Node>> {
        (**self).try_stat(path)
    }

    fn list(&self, path: &str) -> Result<Vec<Node>> {
        (**self).list(path)
    }

    fn rename(&self, source: &str, target: &str) -> Result<()> {
        (**self).rename(source, target)
    }

    fn delete(&self, path: &str) -> Result<()> {
        (**self).delete(path)
    }
}
