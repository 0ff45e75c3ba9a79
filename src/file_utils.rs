use anyhow::{Context, Result};
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
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @returns: Chapter name usable inside a file name
    pub fn sanitize_chapter_name(name: &str) -> String {
        let sanitized: String = name
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '/' | '\\' => '_',
                _ => c,
            })
            .collect();

        if sanitized.is_empty() {
            "unknown".to_string()
        } else {
            sanitized
        }
    }

    // @generates: Output path for a script segment
    // @params: output_dir, ordinal (1-based), chapter name, extension
    pub fn segment_output_path<P: AsRef<Path>>(
        output_dir: P,
        ordinal: usize,
        chapter: &str,
        extension: &str,
    ) -> PathBuf {
        let filename = format!(
            "{:03}_{}.{}",
            ordinal,
            Self::sanitize_chapter_name(chapter),
            extension.trim_start_matches('.')
        );
        output_dir.as_ref().join(filename)
    }

    /// Write bytes to a file, creating the parent directory if needed
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Size of a file in bytes
    pub fn file_size<P: AsRef<Path>>(path: P) -> Result<u64> {
        let metadata = fs::metadata(&path)
            .with_context(|| format!("Failed to read metadata: {:?}", path.as_ref()))?;
        Ok(metadata.len())
    }
}
