//! JSON-file roster of the fish living in the tank.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tank_shared::{FishRecord, FishUpdate, NewFish};

pub const DEFAULT_PATH: &str = "data/fish.json";

pub struct FishStore {
    path: PathBuf,
}

impl FishStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the roster. A missing or unreadable-as-JSON file is an empty tank.
    pub fn load(&self) -> Result<Vec<FishRecord>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read {}", self.path.display()))
            }
        };

        match serde_json::from_str(&data) {
            Ok(records) => Ok(records),
            Err(err) => {
                log::warn!(
                    "Ignoring invalid roster at {}: {}",
                    self.path.display(),
                    err
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, records: &[FishRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(records)?;
        fs::write(&tmp, data).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }

    pub fn create(&self, fish: NewFish) -> Result<FishRecord> {
        if fish.name.trim().is_empty() || fish.image_url.trim().is_empty() {
            bail!("name and image url are required");
        }

        let record = fish.into_record(new_id(), Utc::now());
        let mut records = self.load()?;
        records.push(record.clone());
        self.save(&records)?;

        log::info!("Added {} ({}) to the tank", record.name, record.id);
        Ok(record)
    }

    pub fn all(&self) -> Result<Vec<FishRecord>> {
        self.load()
    }

    pub fn get(&self, id: &str) -> Result<Option<FishRecord>> {
        Ok(self.load()?.into_iter().find(|record| record.id == id))
    }

    /// Apply `update` to the fish with `id`. Returns `None` if there is no such fish.
    pub fn update(&self, id: &str, update: FishUpdate) -> Result<Option<FishRecord>> {
        let mut records = self.load()?;
        let Some(record) = records.iter_mut().find(|record| record.id == id) else {
            return Ok(None);
        };

        update.apply(record);
        let updated = record.clone();
        self.save(&records)?;

        log::info!("Updated {} ({})", updated.name, updated.id);
        Ok(Some(updated))
    }

    /// Remove the fish with `id`. Returns whether anything was removed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            return Ok(false);
        }

        self.save(&records)?;
        log::info!("Removed {} from the tank", id);
        Ok(true)
    }
}

impl Default for FishStore {
    fn default() -> Self {
        Self::new(DEFAULT_PATH)
    }
}

fn new_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}
