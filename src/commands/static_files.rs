use std::path::{Path, PathBuf};

use tokio::fs;

use crate::settings::StaticSettings;

/// Copies every file under the static source directory into the collected
/// root, keeping relative paths. Returns the number of files copied.
pub async fn collect_static(settings: &StaticSettings) -> std::io::Result<usize> {
    copy_tree(Path::new(&settings.source_dir), Path::new(&settings.root)).await
}

async fn copy_tree(source: &Path, target: &Path) -> std::io::Result<usize> {
    let mut copied = 0;
    let mut pending: Vec<PathBuf> = vec![PathBuf::new()];

    while let Some(relative) = pending.pop() {
        fs::create_dir_all(target.join(&relative)).await?;

        let mut entries = fs::read_dir(source.join(&relative)).await?;
        while let Some(entry) = entries.next_entry().await? {
            let child = relative.join(entry.file_name());
            if entry.file_type().await?.is_dir() {
                pending.push(child);
            } else {
                fs::copy(entry.path(), target.join(&child)).await?;
                tracing::debug!(file = %child.display(), "Collected static file");
                copied += 1;
            }
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::StaticStrategy;

    #[tokio::test]
    async fn nested_files_are_copied() {
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(source.path().join("css")).unwrap();
        std::fs::write(source.path().join("css/style.css"), "body{}").unwrap();
        std::fs::write(source.path().join("robots.txt"), "User-agent: *").unwrap();

        let settings = StaticSettings {
            url: "/static/".into(),
            source_dir: source.path().to_string_lossy().into_owned(),
            root: target.path().join("collected").to_string_lossy().into_owned(),
            strategy: StaticStrategy::Collected,
            max_age_seconds: 0,
        };

        let copied = collect_static(&settings).await.unwrap();
        assert_eq!(copied, 2);
        assert_eq!(
            std::fs::read_to_string(target.path().join("collected/css/style.css")).unwrap(),
            "body{}"
        );
    }

    #[tokio::test]
    async fn missing_source_is_an_error() {
        let target = tempfile::tempdir().unwrap();
        let result = copy_tree(Path::new("/definitely/not/here"), target.path()).await;
        assert!(result.is_err());
    }
}
