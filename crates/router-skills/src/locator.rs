//! Skill discovery inside a checkout.
//!
//! A skill is a directory with a `SKILL.md` file directly inside it. Both
//! lookups share one lazy depth-first walk: [`find_all`] drains it, while
//! [`find_first`] takes a single item.

use std::path::{Path, PathBuf};

use router_core::{Result, RouterError};
use tracing::debug;

/// Marker file that makes a directory a skill.
pub const SKILL_MARKER: &str = "SKILL.md";

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &[".git"];

/// True if `dir` directly contains the skill marker.
pub fn is_skill_dir(dir: &Path) -> bool {
    dir.join(SKILL_MARKER).is_file()
}

/// Lazy pre-order walk yielding every directory that satisfies `predicate`.
///
/// A matching directory is not descended into, so no yielded path is a
/// descendant of another. Children are visited in file-name order and
/// symlinks are not followed. An unreadable directory yields one
/// [`RouterError::Access`] and ends the walk.
pub struct TreeWalk<P> {
    stack: Vec<PathBuf>,
    predicate: P,
    failed: bool,
}

impl<P> TreeWalk<P>
where
    P: Fn(&Path) -> bool,
{
    pub fn new(root: impl Into<PathBuf>, predicate: P) -> Self {
        Self {
            stack: vec![root.into()],
            predicate,
            failed: false,
        }
    }
}

impl<P> Iterator for TreeWalk<P>
where
    P: Fn(&Path) -> bool,
{
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while let Some(dir) = self.stack.pop() {
            if (self.predicate)(&dir) {
                debug!(path = ?dir, "matched");
                return Some(Ok(dir));
            }
            match child_dirs(&dir) {
                Ok(children) => self.stack.extend(children.into_iter().rev()),
                Err(e) => {
                    self.failed = true;
                    self.stack.clear();
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// Walk `root` with `predicate`, collecting every match or only the first.
pub fn walk(
    root: &Path,
    predicate: impl Fn(&Path) -> bool,
    stop_after_first: bool,
) -> Result<Vec<PathBuf>> {
    let walk = TreeWalk::new(root, predicate);
    if stop_after_first {
        walk.take(1).collect()
    } else {
        walk.collect()
    }
}

/// Every skill directory under `root` (including `root` itself), in
/// depth-first order. Empty when there is none.
pub fn skills_in(root: &Path) -> TreeWalk<fn(&Path) -> bool> {
    TreeWalk::new(root, is_skill_dir as fn(&Path) -> bool)
}

/// Collect every skill directory under `root`.
pub fn find_all(root: &Path) -> Result<Vec<PathBuf>> {
    walk(root, is_skill_dir, false)
}

/// The first skill directory reachable from `root`: `root` itself if it is
/// a skill, otherwise the first match of the depth-first descent.
pub fn find_first(root: &Path) -> Result<Option<PathBuf>> {
    skills_in(root).next().transpose()
}

/// Sub-directories of `dir`, sorted by name, excluding symlinks and
/// [`SKIPPED_DIRS`].
fn child_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| RouterError::access(dir, e))?;

    let mut children = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RouterError::access(dir, e))?;
        let file_type = entry.file_type().map_err(|e| RouterError::access(entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }
        if SKIPPED_DIRS.iter().any(|s| entry.file_name() == *s) {
            continue;
        }
        children.push(entry.path());
    }
    children.sort();
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn mark(dir: &Path) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(SKILL_MARKER), "---\nname: x\n---\n").unwrap();
    }

    #[test]
    fn find_all_returns_skills_in_walk_order() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        mark(&root.join("a"));
        mark(&root.join("b/c"));

        let found = find_all(root).unwrap();
        assert_eq!(found, vec![root.join("a"), root.join("b/c")]);
    }

    #[test]
    fn find_all_does_not_descend_into_skills() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        mark(&root.join("outer"));
        mark(&root.join("outer/inner"));
        mark(&root.join("other/deep/x"));

        let found = find_all(root).unwrap();
        assert_eq!(found, vec![root.join("other/deep/x"), root.join("outer")]);
        for (i, a) in found.iter().enumerate() {
            for (j, b) in found.iter().enumerate() {
                if i != j {
                    assert!(!a.starts_with(b), "{a:?} is nested in {b:?}");
                }
            }
        }
    }

    #[test]
    fn find_all_empty_tree_is_empty_not_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("docs/guides")).unwrap();
        fs::write(tmp.path().join("docs/README.md"), "readme").unwrap();

        assert!(find_all(tmp.path()).unwrap().is_empty());
        assert_eq!(find_first(tmp.path()).unwrap(), None);
    }

    #[test]
    fn find_all_is_restartable() {
        let tmp = tempfile::tempdir().unwrap();
        mark(&tmp.path().join("one"));
        assert_eq!(find_all(tmp.path()).unwrap(), find_all(tmp.path()).unwrap());
    }

    #[test]
    fn marker_must_be_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("fake/SKILL.md")).unwrap();
        assert!(find_all(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn git_dir_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        mark(&tmp.path().join(".git/hooks"));
        assert!(find_all(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn find_first_prefers_root() {
        let tmp = tempfile::tempdir().unwrap();
        mark(tmp.path());
        mark(&tmp.path().join("nested"));
        assert_eq!(find_first(tmp.path()).unwrap(), Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn find_first_uses_preorder_not_lexical_depth() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        mark(&root.join("a/deep/skill"));
        mark(&root.join("b"));

        assert_eq!(find_first(root).unwrap(), Some(root.join("a/deep/skill")));
    }

    #[test]
    fn find_first_stops_early() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        mark(&root.join("a"));
        mark(&root.join("b"));

        let first = walk(root, is_skill_dir, true).unwrap();
        assert_eq!(first, vec![root.join("a")]);
    }

    #[test]
    fn missing_root_is_access_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        let err = find_all(&missing).unwrap_err();
        match err {
            RouterError::Access { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unreadable_descendant_is_access_error_and_ends_walk() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        mark(&root.join("a"));
        fs::create_dir_all(root.join("b")).unwrap();
        mark(&root.join("c"));

        let mut walk = skills_in(root);
        assert_eq!(walk.next().unwrap().unwrap(), root.join("a"));

        // `b` is already queued; make it unreadable before it is visited.
        fs::remove_dir(root.join("b")).unwrap();
        match walk.next() {
            Some(Err(RouterError::Access { path, .. })) => assert_eq!(path, root.join("b")),
            other => panic!("expected access error, got {other:?}"),
        }
        assert!(walk.next().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_dirs_are_not_followed() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir_all(&root).unwrap();
        mark(&tmp.path().join("elsewhere"));
        std::os::unix::fs::symlink(tmp.path().join("elsewhere"), root.join("link")).unwrap();

        assert!(find_all(&root).unwrap().is_empty());
    }
}
