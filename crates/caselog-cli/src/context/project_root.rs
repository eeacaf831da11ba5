use std::path::PathBuf;

use anyhow::Context;

/// The directory `.caselog/` lives in: `--project` if given, else the
/// current directory.
pub fn resolve_project_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    let Some(path) = project_override else {
        return std::env::current_dir().context("failed to read current directory");
    };

    let explicit = PathBuf::from(path);
    if explicit
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == caselog_config::PROJECT_DIR)
    {
        return explicit
            .parent()
            .map(std::path::Path::to_path_buf)
            .context("invalid --project path: '.caselog' directory has no parent");
    }
    if explicit.is_dir() {
        return Ok(explicit);
    }
    anyhow::bail!("invalid --project path '{path}': not a directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_project_dir_itself() {
        let dir = tempfile::TempDir::new().unwrap();
        let inner = dir.path().join(".caselog");
        std::fs::create_dir(&inner).unwrap();
        let root = resolve_project_root(inner.to_str()).unwrap();
        assert_eq!(root, dir.path());
    }

    #[test]
    fn rejects_missing_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(resolve_project_root(missing.to_str()).is_err());
    }
}
