use std::fs;
use std::path::{Path, PathBuf};

/// Content of a document that has never been saved.
pub const DEFAULT_DOCUMENT: &str = "\n∞∞∞text-a\n";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{path} is not valid UTF-8: {source}")]
    Utf8 {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
}

/// Read a document file verbatim.
pub fn read_document(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|source| IoError::Utf8 {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a document file, or start from [`DEFAULT_DOCUMENT`] when there is
/// none yet.
pub fn load_document(path: &Path) -> Result<String, IoError> {
    match read_document(path) {
        Ok(text) => {
            log::info!("loaded {} ({} bytes)", path.display(), text.len());
            Ok(text)
        }
        Err(IoError::NotFound(_)) => {
            log::info!("{} does not exist, starting a new document", path.display());
            Ok(DEFAULT_DOCUMENT.to_string())
        }
        Err(err) => Err(err),
    }
}

/// Write the document text verbatim
pub fn save_document(path: &Path, text: &str) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    log::info!("saved {} ({} bytes)", path.display(), text.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_gives_default_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scratch.txt");

        let text = load_document(&path).unwrap();

        assert_eq!(text, DEFAULT_DOCUMENT);
        assert!(!path.exists());
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = read_document(&dir.path().join("nope.txt"));
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn test_save_then_load_roundtrips_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scratch.txt");
        let text = "\n∞∞∞json\n{}\n∞∞∞python-a\nprint(1)\n";

        save_document(&path, text).unwrap();

        assert_eq!(load_document(&path).unwrap(), text);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("scratch.txt");

        save_document(&path, DEFAULT_DOCUMENT).unwrap();

        assert!(path.parent().unwrap().is_dir());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_DOCUMENT);
    }

    #[test]
    fn test_save_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scratch.txt");
        std::fs::write(&path, "old").unwrap();

        save_document(&path, "\n∞∞∞text\nnew").unwrap();

        assert_eq!(read_document(&path).unwrap(), "\n∞∞∞text\nnew");
    }

    #[test]
    fn test_invalid_utf8_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = load_document(&path).unwrap_err();

        assert!(matches!(err, IoError::Utf8 { .. }));
        assert!(err.to_string().contains("binary.txt"));
    }
}
