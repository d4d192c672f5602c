//! File creation with a skip-if-exists policy.
//!
//! Existing destinations are left alone and reported as neutral notices
//! unless the caller asks to overwrite. IO failures are returned with a
//! verb-phrase context so that `main` can report them and abort.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::report;

/// What a create operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Skipped,
}

/// Writes `content` to `path`, creating missing parent directories.
pub fn create_file(path: &Path, content: &str, overwrite: bool) -> Result<WriteOutcome> {
    if path.exists() && !overwrite {
        report::neutral(format!("File already exists {}", path.display()));
        return Ok(WriteOutcome::Skipped);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
        && !parent.exists()
    {
        create_dir(parent)?;
    }

    debug!(path = %path.display(), bytes = content.len(), "Writing file");
    fs::write(path, content).with_context(|| format!("create file {}", path.display()))?;
    report::success(format!("create file {}", path.display()));
    Ok(WriteOutcome::Written)
}

/// Creates `path` and any missing parents.
pub fn create_dir(path: &Path) -> Result<WriteOutcome> {
    if path.exists() {
        report::neutral(format!("Directory already exists {}", path.display()));
        return Ok(WriteOutcome::Skipped);
    }

    fs::create_dir_all(path).with_context(|| format!("create dir {}", path.display()))?;
    report::success(format!("create dir {}", path.display()));
    Ok(WriteOutcome::Written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_file_writes_and_creates_parents() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("meta").join("package.xml");

        assert_eq!(create_file(&path, "<a/>", false)?, WriteOutcome::Written);
        assert_eq!(fs::read_to_string(&path)?, "<a/>");
        Ok(())
    }

    #[test]
    fn test_create_file_skips_existing() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("package.xml");
        fs::write(&path, "old")?;

        assert_eq!(create_file(&path, "new", false)?, WriteOutcome::Skipped);
        assert_eq!(fs::read_to_string(&path)?, "old");
        Ok(())
    }

    #[test]
    fn test_create_file_overwrites_when_forced() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("package.xml");
        fs::write(&path, "old")?;

        assert_eq!(create_file(&path, "new", true)?, WriteOutcome::Written);
        assert_eq!(fs::read_to_string(&path)?, "new");
        Ok(())
    }

    #[test]
    fn test_create_file_failure_has_context() -> Result<()> {
        let dir = TempDir::new()?;
        // A directory cannot be written as a file.
        let err = create_file(dir.path(), "x", true).unwrap_err();
        assert!(format!("{:#}", err).starts_with(&format!("create file {}", dir.path().display())));
        Ok(())
    }

    #[test]
    fn test_create_dir_skips_existing() -> Result<()> {
        let dir = TempDir::new()?;
        assert_eq!(create_dir(dir.path())?, WriteOutcome::Skipped);

        let nested = dir.path().join("a").join("b");
        assert_eq!(create_dir(&nested)?, WriteOutcome::Written);
        assert!(nested.is_dir());
        Ok(())
    }
}
