use crate::config::atomic_rename;
use crate::error::StorageError;
use crate::model::{Pet, ATTR_MAX};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use tracing::{debug, warn};

pub(crate) const SAVE_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct PetRecord {
    pub(crate) name: String,
    pub(crate) hunger: u32,
    pub(crate) happiness: u32,
    pub(crate) energy: u32,
    pub(crate) age: u64,
    pub(crate) alive: bool,
    pub(crate) dark_mode: bool,
}

impl From<&Pet> for PetRecord {
    fn from(pet: &Pet) -> Self {
        Self {
            name: pet.name.clone(),
            hunger: pet.hunger,
            happiness: pet.happiness,
            energy: pet.energy,
            age: pet.age,
            alive: pet.alive,
            dark_mode: pet.dark_mode,
        }
    }
}

impl TryFrom<PetRecord> for Pet {
    type Error = StorageError;

    fn try_from(r: PetRecord) -> Result<Self, Self::Error> {
        if r.name.trim().is_empty() {
            return Err(StorageError::Invalid("empty name".to_string()));
        }
        for (field, v) in [
            ("hunger", r.hunger),
            ("happiness", r.happiness),
            ("energy", r.energy),
        ] {
            if v > ATTR_MAX {
                return Err(StorageError::Invalid(format!(
                    "{field} = {v} exceeds {ATTR_MAX}"
                )));
            }
        }
        Ok(Pet {
            name: r.name,
            hunger: r.hunger,
            happiness: r.happiness,
            energy: r.energy,
            age: r.age,
            alive: r.alive,
            dark_mode: r.dark_mode,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct SaveRecord {
    pub(crate) version: u32,
    pub(crate) saved_at: DateTime<Utc>,
    pub(crate) pet: PetRecord,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Reads the save file. A missing file is `Ok(None)`.
pub(crate) fn load(path: &Path) -> Result<Option<Pet>, StorageError> {
    let raw = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let corrupt = |source| StorageError::Corrupt {
        path: path.to_path_buf(),
        source,
    };

    let probe: VersionProbe = serde_json::from_str(&raw).map_err(corrupt)?;
    if probe.version != SAVE_VERSION {
        return Err(StorageError::UnsupportedVersion {
            found: probe.version,
            expected: SAVE_VERSION,
        });
    }

    let record: SaveRecord = serde_json::from_str(&raw).map_err(corrupt)?;
    debug!(saved_at = %record.saved_at, "save record read");
    Pet::try_from(record.pet).map(Some)
}

/// Like [`load`], but any failure is logged and treated as "no save".
pub(crate) fn load_or_discard(path: &Path) -> Option<Pet> {
    match load(path) {
        Ok(pet) => pet,
        Err(e) => {
            warn!(error = %e, path = %path.display(), "discarding unreadable save");
            None
        }
    }
}

pub(crate) fn save_atomic(path: &Path, pet: &Pet) -> Result<(), StorageError> {
    let record = SaveRecord {
        version: SAVE_VERSION,
        saved_at: Utc::now(),
        pet: PetRecord::from(pet),
    };
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(&record)?;
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp, data).map_err(io_err)?;
    atomic_rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn save_path() -> (TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        (dir, path)
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let (_dir, path) = save_path();
        assert!(load(&path).unwrap().is_none());
    }

    #[test]
    fn saved_pet_loads_back_identical() {
        let (_dir, path) = save_path();
        let pet = Pet {
            name: "Mochi".to_string(),
            hunger: 0,
            happiness: 100,
            energy: 37,
            age: 123,
            alive: false,
            dark_mode: true,
        };
        save_atomic(&path, &pet).unwrap();
        assert_eq!(load(&path).unwrap(), Some(pet));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn save_overwrites_previous_record() {
        let (_dir, path) = save_path();
        save_atomic(&path, &Pet::new("First")).unwrap();
        save_atomic(&path, &Pet::new("Second")).unwrap();
        let name = load(&path).unwrap().map(|p| p.name);
        assert_eq!(name.as_deref(), Some("Second"));
    }

    #[test]
    fn garbage_is_reported_as_corrupt() {
        let (_dir, path) = save_path();
        fs::write(&path, "not json").unwrap();
        assert!(matches!(load(&path), Err(StorageError::Corrupt { .. })));

        fs::write(&path, "{ \"version\": 1, \"pet\": 3 }").unwrap();
        assert!(matches!(load(&path), Err(StorageError::Corrupt { .. })));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let (_dir, path) = save_path();
        fs::write(&path, r#"{ "version": 7, "whatever": true }"#).unwrap();
        assert!(matches!(
            load(&path),
            Err(StorageError::UnsupportedVersion {
                found: 7,
                expected: SAVE_VERSION
            })
        ));
    }

    #[test]
    fn out_of_range_attribute_is_invalid() {
        let (_dir, path) = save_path();
        let record = SaveRecord {
            version: SAVE_VERSION,
            saved_at: Utc::now(),
            pet: PetRecord {
                hunger: 150,
                ..PetRecord::from(&Pet::new("Mochi"))
            },
        };
        fs::write(&path, serde_json::to_vec(&record).unwrap()).unwrap();
        assert!(matches!(load(&path), Err(StorageError::Invalid(_))));
    }

    #[test]
    fn empty_name_is_invalid() {
        let record = PetRecord::from(&Pet::new("  "));
        assert!(matches!(Pet::try_from(record), Err(StorageError::Invalid(_))));
    }

    #[test]
    fn discard_falls_back_to_none() {
        let (_dir, path) = save_path();
        fs::write(&path, "{{{").unwrap();
        assert!(load_or_discard(&path).is_none());

        save_atomic(&path, &Pet::new("Mochi")).unwrap();
        assert_eq!(load_or_discard(&path), Some(Pet::new("Mochi")));
    }
}
