use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::info;
use uuid::Uuid;

use crate::{
    matcher::match_result::MatchResult,
    output::{
        match_record::MatchRecord,
        output_store::{OutputStore, StoreError},
    },
};

/// Writes every record as `{id}.json` into a folder.
pub struct FileOutputStore {
    folder: PathBuf,
}

impl FileOutputStore {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    fn checked_folder(&self) -> Result<&Path, StoreError> {
        if self.folder.is_dir() {
            Ok(&self.folder)
        } else {
            Err(StoreError::NotADirectory(self.folder.clone()))
        }
    }

    pub fn write_record(&self, record: &MatchRecord) -> Result<String, StoreError> {
        let folder = self.checked_folder()?;
        let id = Uuid::new_v4().to_string();

        let file = File::create(folder.join(format!("{id}.json")))?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        serde_json::to_writer_pretty(&mut writer, record)?;
        writer.flush()?;

        info!(id = %id, "Stored match output");

        Ok(id)
    }

    pub fn read_record(&self, id: &str) -> Result<MatchRecord, StoreError> {
        let folder = self.checked_folder()?;
        let file = File::open(folder.join(format!("{id}.json")))?;
        let record = serde_json::from_reader(BufReader::new(file))?;

        Ok(record)
    }
}

impl OutputStore for FileOutputStore {
    fn store(&self, result: &MatchResult) -> Result<String, StoreError> {
        self.write_record(&MatchRecord::now(result))
    }
}
