//! In-memory remote filesystem.
//!
//! [`MemoryFs`] behaves like a tiny namenode: it keeps a flat map from path to
//! entry and answers the [`FileSystem`] calls against it. Tests use it to drive
//! the walker, the move engine and the find engine, including reversed listing
//! order and injected remote failures.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use compact_str::CompactString;

use crate::error::{FsError, Result};
use crate::fs::FileSystem;
use crate::node::{Node, NodeKind, Permission};
use crate::path;

const BLOCK_SIZE: u64 = 128 * 1024 * 1024;

#[derive(Debug, Clone)]
struct MemoryEntry {
    kind: NodeKind,
    data: Vec<u8>,
    modified: DateTime<Utc>,
    owner: CompactString,
    group: CompactString,
}

impl MemoryEntry {
    fn new(kind: NodeKind, data: Vec<u8>) -> Self {
        Self {
            kind,
            data,
            modified: Utc::now(),
            owner: "hdfs".into(),
            group: "supergroup".into(),
        }
    }
}

#[derive(Debug)]
struct State {
    entries: BTreeMap<String, MemoryEntry>,
    reversed: bool,
    failing: BTreeSet<String>,
}

impl State {
    fn check(&self, path: &str) -> Result<()> {
        if self.failing.contains(path) {
            return Err(FsError::remote(path, "injected remote failure"));
        }
        Ok(())
    }

    fn children(&self, dir: &str) -> Vec<String> {
        self.entries
            .keys()
            .filter(|key| key.as_str() != "/" && path::parent(key) == Some(dir))
            .cloned()
            .collect()
    }

    fn subtree(&self, root: &str) -> Vec<String> {
        let prefix = path::join(root, "");
        self.entries
            .keys()
            .filter(|key| key.as_str() == root || key.starts_with(&prefix))
            .cloned()
            .collect()
    }

    fn node(&self, path: &str, entry: &MemoryEntry) -> Node {
        let mut node = Node::new(path, entry.kind);
        node.modified = entry.modified;
        node.owner = entry.owner.clone();
        node.group = entry.group.clone();
        match entry.kind {
            NodeKind::File => {
                node.length = entry.data.len() as u64;
                node.replication = 3;
                node.block_size = BLOCK_SIZE;
            }
            NodeKind::Directory => {
                node.permission = Permission(0o755);
                node.children = Some(self.children(path).len() as u64);
            }
        }
        node
    }
}

/// A namenode-like filesystem held entirely in memory.
#[derive(Debug)]
pub struct MemoryFs {
    state: RefCell<State>,
}

impl MemoryFs {
    /// Create an empty filesystem containing only `/`.
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert("/".to_string(), MemoryEntry::new(NodeKind::Directory, Vec::new()));
        Self {
            state: RefCell::new(State {
                entries,
                reversed: false,
                failing: BTreeSet::new(),
            }),
        }
    }

    /// Return listings in reverse name order instead of sorted order.
    pub fn with_reversed_listings(self) -> Self {
        self.state.borrow_mut().reversed = true;
        self
    }

    /// Create a directory and any missing parents.
    pub fn mkdir(&self, dir: &str) -> Result<()> {
        let dir = path::normalize(dir);
        let mut state = self.state.borrow_mut();
        let mut current = String::from("/");
        for segment in dir.split('/').filter(|s| !s.is_empty()) {
            current = path::join(&current, segment);
            match state.entries.get(&current).map(|e| e.kind) {
                Some(NodeKind::Directory) => {}
                Some(NodeKind::File) => return Err(FsError::remote(&current, "Not a directory")),
                None => {
                    state
                        .entries
                        .insert(current.clone(), MemoryEntry::new(NodeKind::Directory, Vec::new()));
                }
            }
        }
        Ok(())
    }

    /// Write a file, creating missing parent directories.
    pub fn put(&self, file: &str, data: impl AsRef<[u8]>) -> Result<()> {
        let file = path::normalize(file);
        if let Some(parent) = path::parent(&file) {
            self.mkdir(parent)?;
        }
        let mut state = self.state.borrow_mut();
        if state.entries.get(&file).is_some_and(|e| e.kind.is_dir()) {
            return Err(FsError::remote(&file, "Is a directory"));
        }
        state
            .entries
            .insert(file, MemoryEntry::new(NodeKind::File, data.as_ref().to_vec()));
        Ok(())
    }

    /// Content of a file, or `None` if it is absent or a directory.
    pub fn get(&self, file: &str) -> Option<Vec<u8>> {
        let state = self.state.borrow();
        state
            .entries
            .get(&path::normalize(file))
            .filter(|e| e.kind.is_file())
            .map(|e| e.data.clone())
    }

    /// Check whether a path exists.
    pub fn exists(&self, p: &str) -> bool {
        self.state.borrow().entries.contains_key(&path::normalize(p))
    }

    /// Set the modification time of an entry.
    pub fn set_modified(&self, p: &str, modified: DateTime<Utc>) -> Result<()> {
        let p = path::normalize(p);
        let mut state = self.state.borrow_mut();
        let entry = state.entries.get_mut(&p).ok_or_else(|| FsError::not_found(&p))?;
        entry.modified = modified;
        Ok(())
    }

    /// Set the owner and group of an entry.
    pub fn set_owner(&self, p: &str, owner: &str, group: &str) -> Result<()> {
        let p = path::normalize(p);
        let mut state = self.state.borrow_mut();
        let entry = state.entries.get_mut(&p).ok_or_else(|| FsError::not_found(&p))?;
        entry.owner = owner.into();
        entry.group = group.into();
        Ok(())
    }

    /// Make every subsequent call touching `p` fail with a remote error.
    pub fn fail_on(&self, p: &str) {
        self.state.borrow_mut().failing.insert(path::normalize(p));
    }

    /// All paths and their file contents (`None` for directories), sorted.
    pub fn snapshot(&self) -> BTreeMap<String, Option<Vec<u8>>> {
        self.state
            .borrow()
            .entries
            .iter()
            .map(|(p, e)| (p.clone(), e.kind.is_file().then(|| e.data.clone())))
            .collect()
    }
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MemoryFs {
    fn stat(&self, p: &str) -> Result<Node> {
        let p = path::normalize(p);
        let state = self.state.borrow();
        state.check(&p)?;
        let entry = state.entries.get(&p).ok_or_else(|| FsError::not_found(&p))?;
        Ok(state.node(&p, entry))
    }

    fn list(&self, p: &str) -> Result<Vec<Node>> {
        let p = path::normalize(p);
        let state = self.state.borrow();
        state.check(&p)?;
        let entry = state.entries.get(&p).ok_or_else(|| FsError::not_found(&p))?;
        if !entry.kind.is_dir() {
            return Err(FsError::remote(&p, "Not a directory"));
        }

        let mut children = state.children(&p);
        if state.reversed {
            children.reverse();
        }
        Ok(children
            .iter()
            .filter_map(|child| state.entries.get(child).map(|e| state.node(child, e)))
            .collect())
    }

    fn rename(&self, source: &str, target: &str) -> Result<()> {
        let source = path::normalize(source);
        let target = path::normalize(target);
        let mut state = self.state.borrow_mut();
        state.check(&source)?;
        state.check(&target)?;

        if source == "/" || !state.entries.contains_key(&source) {
            return Err(FsError::not_found(&source));
        }
        if state.entries.contains_key(&target) {
            return Err(FsError::remote(&target, "File exists"));
        }
        if target.starts_with(&path::join(&source, "")) {
            return Err(FsError::remote(&target, "Cannot move a directory into itself"));
        }
        let parent_is_dir = path::parent(&target)
            .and_then(|parent| state.entries.get(parent))
            .is_some_and(|e| e.kind.is_dir());
        if !parent_is_dir {
            return Err(FsError::remote(&target, "Parent directory does not exist"));
        }

        for old in state.subtree(&source) {
            if let Some(entry) = state.entries.remove(&old) {
                let new = format!("{target}{}", &old[source.len()..]);
                state.entries.insert(new, entry);
            }
        }
        Ok(())
    }

    fn delete(&self, p: &str) -> Result<()> {
        let p = path::normalize(p);
        let mut state = self.state.borrow_mut();
        state.check(&p)?;
        if p == "/" {
            return Err(FsError::remote(&p, "Cannot delete the root directory"));
        }
        if !state.entries.contains_key(&p) {
            return Err(FsError::not_found(&p));
        }
        for old in state.subtree(&p) {
            state.entries.remove(&old);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_creates_parents() {
        let fs = MemoryFs::new();
        fs.put("/a/b/bar.txt", "now is the time").unwrap();

        assert!(fs.stat("/a").unwrap().is_dir());
        assert!(fs.stat("/a/b").unwrap().is_dir());
        assert_eq!(fs.get("/a/b/bar.txt").unwrap(), b"now is the time");
        assert_eq!(fs.stat("/a/b/bar.txt").unwrap().length, 15);
    }

    #[test]
    fn test_list_order() {
        let fs = MemoryFs::new();
        fs.put("/d/b", "").unwrap();
        fs.put("/d/a", "").unwrap();
        fs.mkdir("/d/c").unwrap();

        let names: Vec<_> = fs.list("/d").unwrap().into_iter().map(|n| n.path).collect();
        assert_eq!(names, ["/d/a", "/d/b", "/d/c"]);

        let fs = fs.with_reversed_listings();
        let names: Vec<_> = fs.list("/d").unwrap().into_iter().map(|n| n.path).collect();
        assert_eq!(names, ["/d/c", "/d/b", "/d/a"]);
    }

    #[test]
    fn test_rename_moves_subtree() {
        let fs = MemoryFs::new();
        fs.put("/a/x/y.txt", "y").unwrap();
        fs.mkdir("/b").unwrap();

        fs.rename("/a/x", "/b/x").unwrap();
        assert!(!fs.exists("/a/x"));
        assert_eq!(fs.get("/b/x/y.txt").unwrap(), b"y");
    }

    #[test]
    fn test_rename_refuses_existing_target() {
        let fs = MemoryFs::new();
        fs.put("/a", "a").unwrap();
        fs.put("/b", "b").unwrap();
        assert!(matches!(fs.rename("/a", "/b"), Err(FsError::Remote { .. })));
    }

    #[test]
    fn test_delete_and_try_stat() {
        let fs = MemoryFs::new();
        fs.put("/a/b/c.txt", "c").unwrap();
        fs.delete("/a").unwrap();

        assert!(fs.try_stat("/a/b/c.txt").unwrap().is_none());
        assert!(fs.stat("/a").unwrap_err().is_not_found());
    }

    #[test]
    fn test_injected_failure() {
        let fs = MemoryFs::new();
        fs.mkdir("/a").unwrap();
        fs.fail_on("/a");

        assert!(matches!(fs.try_stat("/a"), Err(FsError::Remote { .. })));
        assert!(matches!(fs.list("/a"), Err(FsError::Remote { .. })));
    }
}
