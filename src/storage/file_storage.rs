use crate::{
    domain::data::{KanbanData, DEFAULT_BOARD_NAME},
    error::{KanbanError, Result},
    storage::{Loaded, Recovery, Storage},
};
use chrono::Utc;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// File-based storage: the whole document as one JSON file
///
/// Writes go to a temporary file in the target directory and are renamed
/// into place, so readers never observe a half-written document.
pub struct FileStorage {
    data_path: PathBuf,
}

impl FileStorage {
    const KANBAN_DIR: &'static str = ".kanban";
    const DATA_FILE: &'static str = "data.json";
    const TMP_PREFIX: &'static str = ".kanban_tmp_";

    /// Environment variable overriding the data file location
    pub const DATA_PATH_ENV: &'static str = "KANBAN_DATA_PATH";

    /// Creates a storage instance for an explicit data file path
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
        }
    }

    /// Creates a storage instance from `KANBAN_DATA_PATH`, falling back to
    /// the default location under the user's home directory
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(Self::DATA_PATH_ENV) {
            Some(path) => Ok(Self::new(PathBuf::from(path))),
            None => Ok(Self::new(Self::default_data_path()?)),
        }
    }

    /// The default data file location, `~/.kanban/data.json`
    pub fn default_data_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            KanbanError::StorageError("could not determine home directory".to_string())
        })?;
        Ok(home.join(Self::KANBAN_DIR).join(Self::DATA_FILE))
    }

    /// The path this storage reads and writes
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    fn data_dir(&self) -> Result<&Path> {
        self.data_path.parent().ok_or_else(|| {
            KanbanError::StorageError(format!(
                "data path has no parent directory: {}",
                self.data_path.display()
            ))
        })
    }

    fn ensure_directory(&self) -> Result<()> {
        let dir = self.data_dir()?;
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Seeds a default document and persists it so the path exists afterwards
    fn create_default(&self) -> Result<KanbanData> {
        debug!(path = %self.data_path.display(), "seeding default kanban data");
        let data = KanbanData::bootstrap(DEFAULT_BOARD_NAME.to_string());
        self.save(&data)?;
        Ok(data)
    }

    /// Moves the corrupt data file aside, preserving its bytes
    fn quarantine_corrupt(&self) -> Result<PathBuf> {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let file_name = self
            .data_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(Self::DATA_FILE);
        let quarantine_path = self
            .data_dir()?
            .join(format!("{}.corrupt.{}", file_name, timestamp));

        fs::rename(&self.data_path, &quarantine_path)?;
        Ok(quarantine_path)
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Loaded> {
        if !self.data_path.exists() {
            let data = self.create_default()?;
            return Ok(Loaded {
                data,
                recovery: None,
            });
        }

        let contents = fs::read_to_string(&self.data_path)?;

        match serde_json::from_str::<KanbanData>(&contents) {
            Ok(data) => Ok(Loaded {
                data,
                recovery: None,
            }),
            Err(err) => {
                let quarantine_path = self.quarantine_corrupt()?;
                warn!(
                    path = %self.data_path.display(),
                    quarantine = %quarantine_path.display(),
                    error = %err,
                    "data file is corrupt; starting over with a fresh board"
                );
                let data = self.create_default()?;
                Ok(Loaded {
                    data,
                    recovery: Some(Recovery {
                        quarantine_path,
                        error: err.to_string(),
                    }),
                })
            }
        }
    }

    fn save(&self, data: &KanbanData) -> Result<()> {
        self.ensure_directory()?;
        let json = serde_json::to_string_pretty(data)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(Self::TMP_PREFIX)
            .tempfile_in(self.data_dir()?)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;

        // A failed persist drops the temp file, leaving the target untouched
        tmp.persist(&self.data_path)
            .map_err(|e| KanbanError::IoError(e.error))?;
        Ok(())
    }

    fn backup(&self, destination: Option<&Path>) -> Result<PathBuf> {
        if !self.data_path.exists() {
            return Err(KanbanError::StorageError(format!(
                "no data file to back up at {}",
                self.data_path.display()
            )));
        }

        let target = match destination {
            Some(path) => path.to_path_buf(),
            None => {
                let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
                self.data_dir()?
                    .join(format!("backup_{}.json", timestamp))
            }
        };

        fs::copy(&self.data_path, &target)?;
        Ok(target)
    }
}
