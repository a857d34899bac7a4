//! Directory enumeration and rendering of the file list.

use std::path::Path;

use packhook_core::AppResult;

/// Name of the list file written into the output directory.
pub const FILE_LIST_NAME: &str = "filelist.md";

/// Lists the names of the regular files in `dir`, sorted, skipping `exclude`.
pub async fn list_files(dir: &Path, exclude: &str) -> AppResult<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name != exclude {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// Renders the markdown list.
pub fn render(names: &[String]) -> String {
    let mut out = String::from("In this build:\n\n");
    for name in names {
        out.push_str("- ");
        out.push_str(name);
        out.push('\n');
    }
    out
}

/// Enumerates `dir` and writes the list file into it.
///
/// Returns the names that were listed.
pub async fn write_file_list(dir: &Path, file_name: &str) -> AppResult<Vec<String>> {
    let names = list_files(dir, file_name).await?;
    tokio::fs::write(dir.join(file_name), render(&names)).await?;
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "In this build:\n\n");
    }

    #[tokio::test]
    async fn test_write_file_list_sorts_and_skips_itself() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("index.bundle.js"), "a").await.unwrap();
        tokio::fs::write(dir.path().join("another.bundle.js"), "b").await.unwrap();
        tokio::fs::write(dir.path().join(FILE_LIST_NAME), "stale").await.unwrap();
        tokio::fs::create_dir(dir.path().join("nested")).await.unwrap();

        let names = write_file_list(dir.path(), FILE_LIST_NAME).await.unwrap();
        assert_eq!(names, vec!["another.bundle.js", "index.bundle.js"]);

        let written = tokio::fs::read_to_string(dir.path().join(FILE_LIST_NAME))
            .await
            .unwrap();
        assert_eq!(
            written,
            "In this build:\n\n- another.bundle.js\n- index.bundle.js\n"
        );
    }

    #[tokio::test]
    async fn test_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_file_list(&dir.path().join("absent"), FILE_LIST_NAME)
            .await
            .unwrap_err();
        assert_eq!(err.kind, packhook_core::ErrorKind::Io);
    }
}
