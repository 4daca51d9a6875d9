//! Run-scoped output sink. Every artifact of one invocation lands under a
//! single timestamped directory whose identity never changes after creation.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

/// Identity and output location of one pipeline invocation.
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: String,
    run_dir: PathBuf,
}

impl RunContext {
    /// Creates the run directory under `output_root`. The id is
    /// timestamp-derived with a short random suffix so runs created within
    /// the same second still get distinct directories.
    pub async fn create(output_root: &Path) -> std::io::Result<Self> {
        let suffix = Uuid::new_v4().simple().to_string();
        let run_id = format!("{}_{}", Utc::now().format("%Y%m%d_%H%M%S"), &suffix[..8]);
        let run_dir = output_root.join(&run_id);
        tokio::fs::create_dir_all(&run_dir).await?;
        Ok(Self { run_id, run_dir })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn dir(&self) -> &Path {
        &self.run_dir
    }

    /// Writes `content` under the run directory. The same logical name
    /// replaces prior content; intermediate directories are created on
    /// first use.
    pub async fn persist(&self, name: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.run_dir.join(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, content).await?;
        info!("saved {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn persist_writes_under_the_run_directory() {
        let root = tempfile::tempdir().unwrap();
        let run = RunContext::create(root.path()).await.unwrap();

        let path = run.persist("resource_guide.md", "# Guide").await.unwrap();

        assert!(path.starts_with(run.dir()));
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "# Guide");
    }

    #[tokio::test]
    async fn same_name_replaces_prior_content() {
        let root = tempfile::tempdir().unwrap();
        let run = RunContext::create(root.path()).await.unwrap();

        run.persist("note.txt", "first").await.unwrap();
        let path = run.persist("note.txt", "second").await.unwrap();

        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn nested_logical_names_create_parent_directories() {
        let root = tempfile::tempdir().unwrap();
        let run = RunContext::create(root.path()).await.unwrap();

        let path = run.persist("visuals/concept_1.svg", "<svg/>").await.unwrap();

        assert!(path.exists());
    }

    #[tokio::test]
    async fn runs_created_back_to_back_get_distinct_directories() {
        let root = tempfile::tempdir().unwrap();
        let a = RunContext::create(root.path()).await.unwrap();
        let b = RunContext::create(root.path()).await.unwrap();

        assert_ne!(a.run_id(), b.run_id());
        assert_ne!(a.dir(), b.dir());
    }
}
