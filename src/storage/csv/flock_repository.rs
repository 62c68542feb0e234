//! YAML-backed flock repository using filesystem discovery.

use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::Arc;

use crate::domain::models::flock::Flock;
use crate::storage::traits::FlockStorage;

use super::connection::CsvConnection;

/// Intermediate struct for YAML serialization with string date fields
#[derive(Debug, Clone, Serialize, Deserialize)]
struct YamlFlock {
    id: String,
    breed: String,
    arrival_date: String,
    initial_chicks: u32,
    extra_chicks: u32,
    price_per_chick: f64,
    created_at: String,
    updated_at: String,
}

/// Flock repository storing one `flock.yaml` per flock directory
#[derive(Clone)]
pub struct FlockRepository {
    connection: Arc<CsvConnection>,
}

impl FlockRepository {
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }

    /// Load a flock from its directory, `None` when the directory holds no
    /// metadata file
    fn load_flock_from_directory(&self, flock_id: &str) -> Result<Option<Flock>> {
        let yaml_path = self.connection.flock_yaml_path(flock_id);

        if !yaml_path.exists() {
            return Ok(None);
        }

        let yaml_content = fs::read_to_string(&yaml_path)?;
        let yaml_flock: YamlFlock = serde_yaml::from_str(&yaml_content)?;

        let flock = Flock {
            id: yaml_flock.id,
            breed: yaml_flock.breed,
            arrival_date: chrono::NaiveDate::parse_from_str(&yaml_flock.arrival_date, "%Y-%m-%d")
                .map_err(|e| anyhow!("Failed to parse arrival_date: {}", e))?,
            initial_chicks: yaml_flock.initial_chicks,
            extra_chicks: yaml_flock.extra_chicks,
            price_per_chick: yaml_flock.price_per_chick,
            created_at: chrono::DateTime::parse_from_rfc3339(&yaml_flock.created_at)
                .map_err(|e| anyhow!("Failed to parse created_at: {}", e))?
                .with_timezone(&chrono::Utc),
            updated_at: chrono::DateTime::parse_from_rfc3339(&yaml_flock.updated_at)
                .map_err(|e| anyhow!("Failed to parse updated_at: {}", e))?
                .with_timezone(&chrono::Utc),
        };

        Ok(Some(flock))
    }

    /// Save a flock to its directory with an atomic temp file rename
    fn save_flock_to_directory(&self, flock: &Flock) -> Result<()> {
        let flock_dir = self.connection.flock_directory(&flock.id);
        if !flock_dir.exists() {
            fs::create_dir_all(&flock_dir)?;
            info!("Created flock directory: {:?}", flock_dir);
        }

        let yaml_flock = YamlFlock {
            id: flock.id.clone(),
            breed: flock.breed.clone(),
            arrival_date: flock.arrival_date.format("%Y-%m-%d").to_string(),
            initial_chicks: flock.initial_chicks,
            extra_chicks: flock.extra_chicks,
            price_per_chick: flock.price_per_chick,
            created_at: flock.created_at.to_rfc3339(),
            updated_at: flock.updated_at.to_rfc3339(),
        };

        let yaml_path = self.connection.flock_yaml_path(&flock.id);
        let yaml_content = serde_yaml::to_string(&yaml_flock)?;

        let temp_path = yaml_path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &yaml_path)?;

        Ok(())
    }

    /// Discover all flocks by scanning the flocks directory
    fn discover_flocks(&self) -> Result<Vec<Flock>> {
        let flocks_dir = self.connection.flocks_directory();

        if !flocks_dir.exists() {
            debug!("Flocks directory doesn't exist, returning empty list");
            return Ok(Vec::new());
        }

        let mut flocks = Vec::new();

        for entry in fs::read_dir(flocks_dir)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_dir() {
                continue;
            }

            let dir_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => {
                    warn!("Skipping directory with invalid name: {:?}", path);
                    continue;
                }
            };

            match self.load_flock_from_directory(dir_name) {
                Ok(Some(flock)) => {
                    debug!("Discovered flock: {} from directory: {}", flock.id, dir_name);
                    flocks.push(flock);
                }
                Ok(None) => {
                    debug!("Directory {} doesn't contain a valid flock", dir_name);
                }
                Err(e) => {
                    warn!("Error loading flock from directory {}: {}", dir_name, e);
                }
            }
        }

        // Most recently created first, matching the entry forms
        flocks.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        debug!("Discovered {} flocks", flocks.len());
        Ok(flocks)
    }
}

impl FlockStorage for FlockRepository {
    fn store_flock(&self, flock: &Flock) -> Result<()> {
        self.save_flock_to_directory(flock)?;
        info!("Stored flock: {}", flock.id);
        Ok(())
    }

    fn get_flock(&self, flock_id: &str) -> Result<Option<Flock>> {
        self.load_flock_from_directory(flock_id)
    }

    fn list_flocks(&self) -> Result<Vec<Flock>> {
        self.discover_flocks()
    }

    fn update_flock(&self, flock: &Flock) -> Result<()> {
        if self.load_flock_from_directory(&flock.id)?.is_none() {
            return Err(anyhow!("Flock not found: {}", flock.id));
        }
        self.save_flock_to_directory(flock)?;
        info!("Updated flock: {}", flock.id);
        Ok(())
    }

    fn delete_flock(&self, flock_id: &str) -> Result<()> {
        let flock_dir = self.connection.flock_directory(flock_id);
        if flock_dir.exists() {
            fs::remove_dir_all(&flock_dir)?;
            info!("Deleted flock directory: {:?}", flock_dir);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::test_connection;
    use chrono::{NaiveDate, Utc};

    fn sample_flock(id: &str) -> Flock {
        let now = Utc::now();
        Flock {
            id: id.to_string(),
            breed: "Ross 308".to_string(),
            arrival_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            initial_chicks: 500,
            extra_chicks: 10,
            price_per_chick: 45.5,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_store_and_get_round_trip() {
        let (connection, _temp_dir) = test_connection();
        let repository = FlockRepository::new(connection);

        let flock = sample_flock("fl-1");
        repository.store_flock(&flock).unwrap();

        let loaded = repository.get_flock("fl-1").unwrap().unwrap();
        assert_eq!(loaded.breed, flock.breed);
        assert_eq!(loaded.arrival_date, flock.arrival_date);
        assert_eq!(loaded.initial_chicks, 500);
        assert_eq!(loaded.extra_chicks, 10);
        assert_eq!(loaded.price_per_chick, 45.5);
    }

    #[test]
    fn test_get_missing_flock_returns_none() {
        let (connection, _temp_dir) = test_connection();
        let repository = FlockRepository::new(connection);

        assert!(repository.get_flock("fl-nope").unwrap().is_none());
    }

    #[test]
    fn test_delete_removes_directory() {
        let (connection, _temp_dir) = test_connection();
        let repository = FlockRepository::new(connection.clone());

        let flock = sample_flock("fl-2");
        repository.store_flock(&flock).unwrap();
        assert!(connection.flock_directory("fl-2").exists());

        repository.delete_flock("fl-2").unwrap();
        assert!(!connection.flock_directory("fl-2").exists());
        assert!(repository.get_flock("fl-2").unwrap().is_none());
    }
}
