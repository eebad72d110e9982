use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::fmt::MakeWriter;

/// Appending file writer for the tracing file layer
pub struct FileWriter {
    path: PathBuf,
}

impl FileWriter {
    pub fn new(path: PathBuf) -> Self {
        if let Some(parent) = path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                eprintln!(
                    "warning: failed to create log directory {}: {}",
                    parent.display(),
                    err
                );
            }
        }
        Self { path }
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = Box<dyn Write + Send + Sync + 'a>;

    fn make_writer(&'a self) -> Self::Writer {
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            Ok(file) => Box::new(std::io::BufWriter::new(file)),
            // stdout carries artifacts, so the fallback is stderr
            Err(_) => Box::new(std::io::stderr()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_parent_directories_and_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs").join("fe-graph.log");
        let writer = FileWriter::new(path.clone());

        {
            let mut w = writer.make_writer();
            w.write_all(b"first\n").unwrap();
        }
        {
            let mut w = writer.make_writer();
            w.write_all(b"second\n").unwrap();
        }

        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }
}
