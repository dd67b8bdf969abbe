//! Discovery - Find agent documents on disk

use shared::{Result, RosterError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// File extension of agent documents
pub const DOCUMENT_EXTENSION: &str = "md";

/// Expand roots into a de-duplicated list of agent documents.
///
/// A root may be a file (taken as is), a directory (every `*.md` file beneath
/// it, README files excluded) or a glob pattern. Roots keep the order they
/// were given in; each directory or pattern expands in sorted path order.
/// A path reached twice keeps its first position.
pub fn discover<P: AsRef<Path>>(roots: &[P]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for root in roots {
        let root = root.as_ref();
        if root.is_file() {
            found.push(root.to_path_buf());
        } else if root.is_dir() {
            let pattern = format!(
                "{}/**/*.{}",
                glob::Pattern::escape(&root.to_string_lossy()),
                DOCUMENT_EXTENSION
            );
            found.extend(expand(&pattern)?.into_iter().filter(|p| !is_readme(p)));
        } else if is_pattern(root) {
            found.extend(expand(&root.to_string_lossy())?);
        } else {
            return Err(RosterError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("agent path '{}' does not exist", root.display()),
            )));
        }
    }

    let mut seen = HashSet::new();
    found.retain(|path| seen.insert(path.clone()));
    tracing::debug!(count = found.len(), "discovered agent documents");
    Ok(found)
}

fn expand(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in glob::glob(pattern)? {
        let path = entry.map_err(|e| RosterError::Io(e.into()))?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn is_pattern(path: &Path) -> bool {
    path.to_string_lossy().contains(['*', '?', '['])
}

fn is_readme(path: &Path) -> bool {
    path.file_stem()
        .map(|stem| stem.eq_ignore_ascii_case("readme"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "---\nname: x\n---\n").unwrap();
    }

    #[test]
    fn test_discover_directory_recursively() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("ios-engineer.md"));
        touch(&dir.path().join("ml/ml-engineer.md"));
        touch(&dir.path().join("README.md"));
        touch(&dir.path().join("notes.txt"));

        let found = discover(&[dir.path()]).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("ios-engineer.md"), PathBuf::from("ml/ml-engineer.md")]
        );
    }

    #[test]
    fn test_discover_file_and_pattern_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.md");
        let b = dir.path().join("b.md");
        touch(&a);
        touch(&b);

        let pattern = dir.path().join("*.md");
        let found = discover(&[a.clone(), pattern]).unwrap();
        assert_eq!(found, vec![a, b]);
    }

    #[test]
    fn test_discover_keeps_explicit_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.md");
        let b = dir.path().join("b.md");
        touch(&a);
        touch(&b);

        let found = discover(&[b.clone(), a.clone(), b.clone()]).unwrap();
        assert_eq!(found, vec![b, a]);
    }

    #[test]
    fn test_discover_missing_path() {
        let err = discover(&[Path::new("/definitely/not/here")]).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_discover_empty_roots() {
        let roots: [&Path; 0] = [];
        assert!(discover(&roots).unwrap().is_empty());
    }
}
