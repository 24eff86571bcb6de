use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    //
    // Safe under concurrent creation attempts for the same directory.
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @creates: Placeholder file with the given content, if absent
    // @returns: true when the file was created by this call
    //
    // Guards against consumers observing a missing or zero-byte file
    // before the document stream finishes.
    pub fn ensure_placeholder<P: AsRef<Path>>(path: P, content: &str) -> std::io::Result<bool> {
        let path = path.as_ref();
        if Self::file_exists(path) {
            return Ok(false);
        }
        fs::write(path, content)?;
        Ok(true)
    }

    // @generates: Season-scoped directory path for an episode
    pub fn season_dir<P: AsRef<Path>>(base_dir: P, season: &str) -> PathBuf {
        base_dir.as_ref().join(format!("season{}", season))
    }

    // @generates: Output path for a rendered episode document
    // @params: base_dir, season, episode_number, normalized_name, extension
    pub fn episode_output_path<P: AsRef<Path>>(
        base_dir: P,
        season: &str,
        episode_number: &str,
        normalized_name: &str,
        extension: &str,
    ) -> PathBuf {
        Self::season_dir(base_dir, season)
            .join(format!("{}.{}.{}", episode_number, normalized_name, extension))
    }
}
