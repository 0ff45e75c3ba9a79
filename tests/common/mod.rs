/*!
 * Common test utilities for the televox test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use televox::script::{Chapter, Script, Segment};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds a script from (chapter, lines) pairs
pub fn script_from(chapters: &[(&str, &[&str])]) -> Script {
    Script {
        chapters: chapters
            .iter()
            .map(|(name, lines)| Chapter {
                name: name.to_string(),
                segments: lines.iter().map(|l| Segment::new(*l)).collect(),
            })
            .collect(),
    }
}

/// Sample script covering spoken and skipped segments
pub fn sample_script_json() -> &'static str {
    r#"{
  "title": "Demo",
  "chapters": [
    {
      "chapter": "Intro Part",
      "segments": [
        {"line": "Welcome • to the **show**"},
        {"line": "[Look at camera]"},
        {"line": "{excited: Let's go!}"}
      ]
    },
    {
      "chapter": "Outro",
      "segments": [
        {"line": "//"},
        {"line": "Thanks for watching • • •", "notes": "smile"},
        {"line": "[end]"}
      ]
    }
  ]
}"#
}

/// Helper to get the absolute path to a test resource
pub fn test_resource_path(relative_path: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("resources");
    path.push(relative_path);
    path
}
