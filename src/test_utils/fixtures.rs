use std::path::PathBuf;

use tempfile::TempDir;

use crate::feed::REQUIRED_COLUMNS;

/// Test fixture providing an isolated filesystem environment.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl Default for UnitTestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitTestFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();

        println!("[FIXTURE] Created temp directory: {data_path:?}");

        Self {
            temp_dir,
            data_path,
        }
    }

    /// Create a test file with content.
    #[must_use]
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        println!(
            "[FIXTURE] Created file: {:?} ({} bytes)",
            full_path,
            content.len()
        );
        full_path
    }

    /// Write `videos.csv` with the required header and the given rows, in
    /// header order: id, title, channel, views, likes, dislikes, comments,
    /// publish time.
    #[must_use]
    pub fn create_videos_csv(&self, rows: &[[&str; 8]]) -> PathBuf {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(REQUIRED_COLUMNS)
            .expect("Failed to write header");
        for row in rows {
            writer.write_record(row).expect("Failed to write row");
        }
        let bytes = writer.into_inner().expect("Failed to flush csv");
        let content = String::from_utf8(bytes).expect("csv is utf-8");
        self.create_file("videos.csv", &content)
    }
}

impl Drop for UnitTestFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.data_path);
    }
}
