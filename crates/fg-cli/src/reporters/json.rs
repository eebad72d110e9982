use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Pretty-printed JSON artifacts. No timestamps, so unchanged input gives identical bytes.
pub struct JsonReporter;

impl JsonReporter {
    pub fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    /// Writes the artifact, creating the parent directory if needed
    pub fn write<T: Serialize + ?Sized>(&self, value: &T, output_path: &Path) -> Result<()> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json_string = self.render(value)?;
        fs::write(output_path, json_string)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("outputs/nested/frontend_graph.json");
        JsonReporter.write(&vec!["a", "b"], &path).unwrap();
        let written: Vec<String> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, vec!["a", "b"]);
    }
}
