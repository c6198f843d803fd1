use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

use crate::constants::SNAPSHOT_VERSION;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Volunteer,
}

// One user as the map provider sees it. Credentials and sessions live elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub about: String,
    pub role: Role,
    pub city: String,
    pub coordinates: (f64, f64),
}

fn default_language() -> String {
    "en".to_string()
}

// Structure for disk persistence
#[derive(Serialize, Deserialize)]
pub struct CachedDatabase {
    pub version: u32,
    pub source_paths: Vec<String>,
    pub users: Vec<UserRecord>,
}

// Store handle, cheap to clone into handlers
#[derive(Clone, Default)]
pub struct Database {
    users: Arc<RwLock<Vec<UserRecord>>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<UserRecord>>> {
        self.users
            .read()
            .map_err(|_| anyhow!("user store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<UserRecord>>> {
        self.users
            .write()
            .map_err(|_| anyhow!("user store lock poisoned"))
    }

    pub fn clear_all_users(&self) -> Result<()> {
        self.write()?.clear();
        Ok(())
    }

    /// Insert or replace, keyed by email.
    pub fn insert_user(&self, user: &UserRecord) -> Result<()> {
        let mut users = self.write()?;
        upsert(&mut users, user);
        Ok(())
    }

    pub fn insert_users_batch(&self, new_users: &[UserRecord]) -> Result<usize> {
        if new_users.is_empty() {
            return Ok(0);
        }

        let mut users = self.write()?;
        for user in new_users {
            upsert(&mut users, user);
        }
        Ok(new_users.len())
    }

    pub fn get_all_users(&self) -> Result<Vec<UserRecord>> {
        Ok(self.read()?.clone())
    }

    pub fn get_users_count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    /// Load a JSON array of users and merge it into the store.
    pub fn import_json(&self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read user file {}", path.display()))?;
        let users: Vec<UserRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse user file {}", path.display()))?;
        let inserted = self.insert_users_batch(&users)?;
        info!("Imported {} users from {}", inserted, path.display());
        Ok(inserted)
    }

    /// Save the current store to `path` using bincode
    pub fn save_to_disk(&self, path: &Path, source_paths: &[String]) -> Result<()> {
        let cache = CachedDatabase {
            version: SNAPSHOT_VERSION,
            source_paths: source_paths.to_vec(),
            users: self.get_all_users()?,
        };

        if let Some(parent) = path.parent() {
            crate::utils::ensure_directory_exists(parent)?;
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create snapshot {}", path.display()))?;
        bincode::serialize_into(file, &cache).context("Failed to write snapshot")?;
        Ok(())
    }

    /// Replace the store with the snapshot at `path` if it was written for
    /// exactly `expected_paths`. Unreadable or outdated snapshots are deleted.
    pub fn load_from_disk(&self, path: &Path, expected_paths: &[String]) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        let file = std::fs::File::open(path)?;
        let cache: CachedDatabase = match bincode::deserialize_from(file) {
            Ok(c) => c,
            Err(e) => {
                warn!("Snapshot {} is corrupted ({}), deleting it", path.display(), e);
                let _ = std::fs::remove_file(path);
                return Ok(false);
            }
        };

        if cache.version != SNAPSHOT_VERSION {
            warn!(
                "Snapshot version mismatch (found {}, expected {}), deleting it",
                cache.version, SNAPSHOT_VERSION
            );
            let _ = std::fs::remove_file(path);
            return Ok(false);
        }

        if cache.source_paths != expected_paths {
            return Ok(false);
        }

        *self.write()? = cache.users;
        Ok(true)
    }
}

fn upsert(users: &mut Vec<UserRecord>, user: &UserRecord) {
    if let Some(existing) = users.iter_mut().find(|u| u.email == user.email) {
        *existing = user.clone();
    } else {
        users.push(user.clone());
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn user(email: &str, role: Role, city: &str, coordinates: (f64, f64)) -> UserRecord {
        UserRecord {
            email: email.to_string(),
            first_name: "Ana".to_string(),
            last_name: "Lopez".to_string(),
            language: "es".to_string(),
            about: String::new(),
            role,
            city: city.to_string(),
            coordinates,
        }
    }

    #[test]
    fn test_insert_replaces_by_email() {
        let db = Database::new();
        db.insert_user(&user("a@example.com", Role::Client, "Madrid", (40.4, -3.7)))
            .unwrap();
        db.insert_user(&user("a@example.com", Role::Volunteer, "Paris", (48.8, 2.3)))
            .unwrap();

        let users = db.get_all_users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::Volunteer);
        assert_eq!(users[0].city, "Paris");
    }

    #[test]
    fn test_batch_insert_and_clear() {
        let db = Database::new();
        let batch = vec![
            user("a@example.com", Role::Client, "Madrid", (40.4, -3.7)),
            user("b@example.com", Role::Volunteer, "Madrid", (40.4, -3.7)),
        ];
        assert_eq!(db.insert_users_batch(&batch).unwrap(), 2);
        assert_eq!(db.insert_users_batch(&[]).unwrap(), 0);
        assert_eq!(db.get_users_count().unwrap(), 2);

        db.clear_all_users().unwrap();
        assert_eq!(db.get_users_count().unwrap(), 0);
    }

    #[test]
    fn test_import_json_defaults_language() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(
            &path,
            r#"[{"email":"c@example.com","first_name":"Carl","last_name":"Diaz",
                "role":"client","city":"Austin","coordinates":[30.27,-97.74]}]"#,
        )
        .unwrap();

        let db = Database::new();
        assert_eq!(db.import_json(&path).unwrap(), 1);
        let users = db.get_all_users().unwrap();
        assert_eq!(users[0].language, "en");
        assert_eq!(users[0].coordinates, (30.27, -97.74));
    }

    #[test]
    fn test_import_json_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Database::new().import_json(&path).is_err());
    }

    #[test]
    fn test_snapshot_requires_matching_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot").join("users_v1.bin");
        let sources = vec!["users.json".to_string()];

        let db = Database::new();
        db.insert_user(&user("a@example.com", Role::Client, "Madrid", (40.4, -3.7)))
            .unwrap();
        db.save_to_disk(&path, &sources).unwrap();

        let other = Database::new();
        assert!(!other.load_from_disk(&path, &["other.json".to_string()]).unwrap());
        assert_eq!(other.get_users_count().unwrap(), 0);

        assert!(other.load_from_disk(&path, &sources).unwrap());
        assert_eq!(other.get_all_users().unwrap(), db.get_all_users().unwrap());
    }

    #[test]
    fn test_corrupted_snapshot_is_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users_v1.bin");
        std::fs::write(&path, [0xff, 0x01]).unwrap();

        assert!(!Database::new().load_from_disk(&path, &[]).unwrap());
        assert!(!path.exists());
    }
}
