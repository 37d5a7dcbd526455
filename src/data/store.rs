//! On-disk layout for raw payloads and derived datasets

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::{Config, LaneError, Result, Role};

/// Paths of every file the pipeline reads or writes
#[derive(Debug, Clone)]
pub struct DataLayout {
    pub root: PathBuf,
    pub matches_dir: PathBuf,
    pub timelines_dir: PathBuf,
    pub index_path: PathBuf,
    pub snapshots_path: PathBuf,
    pub labeled_path: PathBuf,
}

impl DataLayout {
    pub fn new<P: AsRef<Path>>(root: P, role: Role) -> Self {
        let root = root.as_ref().to_path_buf();
        let stem = role.file_stem();
        DataLayout {
            matches_dir: root.join("matches"),
            timelines_dir: root.join("timelines"),
            index_path: root
                .join("clean_matches")
                .join(format!("{}_matches_index.json", stem)),
            snapshots_path: root
                .join("datasets")
                .join(format!("{}_matches_summary.csv", stem)),
            labeled_path: root
                .join("datasets")
                .join(format!("{}_matches_labeled.csv", stem)),
            root,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.data.data_dir, config.filter.role)
    }

    pub fn match_path(&self, match_id: &str) -> PathBuf {
        self.matches_dir.join(format!("{}.json", match_id))
    }

    pub fn timeline_path(&self, match_id: &str) -> PathBuf {
        self.timelines_dir
            .join(format!("{}_timeline.json", match_id))
    }

    /// Create the raw payload directories
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.matches_dir)?;
        std::fs::create_dir_all(&self.timelines_dir)?;
        Ok(())
    }

    /// Raw match files sorted by name
    pub fn list_match_files(&self) -> Result<Vec<PathBuf>> {
        if !self.matches_dir.exists() {
            return Err(LaneError::MissingInput {
                path: self.matches_dir.clone(),
                hint: "run `lanephase download` first".to_string(),
            });
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.matches_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        files.sort();
        Ok(files)
    }
}

/// Read the reference player's puuid from its single-line file
pub fn load_puuid<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LaneError::MissingInput {
            path: path.to_path_buf(),
            hint: "run `lanephase account` first to store the player's puuid".to_string(),
        });
    }

    let puuid = std::fs::read_to_string(path)?.trim().to_string();
    if puuid.is_empty() {
        return Err(LaneError::Config(format!("{} is empty", path.display())));
    }
    Ok(puuid)
}

pub fn save_puuid<P: AsRef<Path>>(path: P, puuid: &str) -> Result<()> {
    std::fs::write(path, puuid)?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Write pretty-printed JSON, creating parent directories
pub fn write_json_pretty<T: Serialize + ?Sized, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_paths() {
        let layout = DataLayout::new("data", Role::Top);
        assert_eq!(
            layout.timeline_path("NA1_1"),
            PathBuf::from("data/timelines/NA1_1_timeline.json")
        );
        assert_eq!(
            layout.index_path,
            PathBuf::from("data/clean_matches/top_matches_index.json")
        );
        assert_eq!(
            layout.labeled_path,
            PathBuf::from("data/datasets/top_matches_labeled.csv")
        );
    }

    #[test]
    fn test_load_puuid_trims() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("puuid.txt");
        std::fs::write(&path, "  abc-123\n")?;

        assert_eq!(load_puuid(&path)?, "abc-123");
        Ok(())
    }

    #[test]
    fn test_load_puuid_missing() {
        let err = load_puuid("/nonexistent/puuid.txt").unwrap_err();
        assert!(matches!(err, LaneError::MissingInput { .. }));
    }

    #[test]
    fn test_list_match_files_sorted() -> Result<()> {
        let dir = TempDir::new()?;
        let layout = DataLayout::new(dir.path(), Role::Top);
        layout.ensure_dirs()?;
        std::fs::write(layout.match_path("NA1_2"), "{}")?;
        std::fs::write(layout.match_path("NA1_1"), "{}")?;
        std::fs::write(layout.matches_dir.join("notes.txt"), "x")?;

        let files = layout.list_match_files()?;
        assert_eq!(files, vec![layout.match_path("NA1_1"), layout.match_path("NA1_2")]);
        Ok(())
    }

    #[test]
    fn test_json_roundtrip_creates_dirs() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested").join("out.json");
        write_json_pretty(&path, &vec![1, 2, 3])?;

        let back: Vec<i32> = read_json(&path)?;
        assert_eq!(back, vec![1, 2, 3]);
        Ok(())
    }
}
