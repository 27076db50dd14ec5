use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, FixedOffset};
use eco_types::{LedgerResult, LedgerSnapshot, PlantEvent, PlantReceipt, Points, DEFAULT_BALANCE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::traits::LedgerStore;

/// Snapshot file name inside the data directory.
pub const SNAPSHOT_FILE: &str = "ledger.json";
/// Legacy balance file, `{"points": n}`.
pub const LEGACY_POINTS_FILE: &str = "points.json";
/// Legacy plant history file, `[event, ...]`.
pub const LEGACY_PLANTS_FILE: &str = "plants.json";

/// File-backed ledger store.
///
/// The whole snapshot lives in one pretty-printed JSON file. Each mutation
/// writes the updated snapshot to a temporary file in the same directory,
/// syncs it, and renames it over [`SNAPSHOT_FILE`]. Readers of the file see
/// either the old snapshot or the new one, never a torn write.
///
/// On first open an absent snapshot is created, importing the legacy
/// `points.json` / `plants.json` pair when present.
pub struct FileLedgerStore {
    path: PathBuf,
    state: Mutex<LedgerSnapshot>,
}

#[derive(Deserialize)]
struct LegacyPoints {
    #[serde(default)]
    points: Points,
}

impl FileLedgerStore {
    /// Open (or create) the store under `data_dir`.
    pub fn open(data_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = data_dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(SNAPSHOT_FILE);

        let snapshot = if path.exists() {
            read_snapshot(&path)?
        } else {
            let snapshot = match import_legacy(dir)? {
                Some(imported) => {
                    info!(
                        points = imported.points,
                        plants = imported.plants.len(),
                        "imported legacy ledger files"
                    );
                    imported
                }
                None => LedgerSnapshot::default(),
            };
            write_atomic(&path, &snapshot)?;
            info!(path = %path.display(), "created ledger snapshot");
            snapshot
        };

        Ok(Self {
            path,
            state: Mutex::new(snapshot),
        })
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `op` against a working copy; persist and publish it if `op`
    /// succeeds.
    pub fn transact<T>(
        &self,
        op: impl FnOnce(&mut LedgerSnapshot) -> LedgerResult<T>,
    ) -> StoreResult<T> {
        let mut state = self.state.lock().expect("lock poisoned");
        let mut next = state.clone();
        let out = op(&mut next)?;
        write_atomic(&self.path, &next)?;
        *state = next;
        Ok(out)
    }
}

impl LedgerStore for FileLedgerStore {
    fn snapshot(&self) -> LedgerSnapshot {
        self.state.lock().expect("lock poisoned").clone()
    }

    fn add_points(&self, delta: Points) -> StoreResult<Points> {
        let balance = self.transact(|snap| snap.credit(delta))?;
        debug!(delta, balance, "points added");
        Ok(balance)
    }

    fn plant(&self, at: &DateTime<FixedOffset>) -> StoreResult<PlantReceipt> {
        let receipt = self.transact(|snap| snap.plant(at))?;
        debug!(balance = receipt.balance, "tree planted");
        Ok(receipt)
    }
}

impl std::fmt::Debug for FileLedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLedgerStore")
            .field("path", &self.path)
            .finish()
    }
}

fn corrupt(path: &Path, reason: impl ToString) -> StoreError {
    StoreError::Corrupt {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn read_snapshot(path: &Path) -> StoreResult<LedgerSnapshot> {
    let raw = fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Ok(LedgerSnapshot::default());
    }
    serde_json::from_str(&raw).map_err(|e| corrupt(path, e))
}

fn import_legacy(dir: &Path) -> StoreResult<Option<LedgerSnapshot>> {
    let points_path = dir.join(LEGACY_POINTS_FILE);
    let plants_path = dir.join(LEGACY_PLANTS_FILE);
    if !points_path.exists() && !plants_path.exists() {
        return Ok(None);
    }

    let points = read_legacy::<LegacyPoints>(&points_path)?
        .map(|legacy| legacy.points)
        .unwrap_or(DEFAULT_BALANCE);
    let plants = read_legacy::<Vec<PlantEvent>>(&plants_path)?.unwrap_or_default();

    Ok(Some(LedgerSnapshot { points, plants }))
}

/// Read one legacy file. A missing, empty, or `null` file yields `None`.
fn read_legacy<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<Option<T>>(&raw).map_err(|e| corrupt(path, e))
}

fn write_atomic(path: &Path, snapshot: &LedgerSnapshot) -> StoreResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let data = serde_json::to_vec_pretty(snapshot)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(&data)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use eco_types::{LedgerError, TREE_COST};

    fn at(minute: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(2025, 1, 2, 8, minute, 0)
            .unwrap()
            .fixed_offset()
    }

    fn event(minute: u32) -> PlantEvent {
        PlantEvent::tree_at(&at(minute))
    }

    #[test]
    fn open_creates_default_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLedgerStore::open(dir.path()).unwrap();
        assert_eq!(store.balance(), DEFAULT_BALANCE);
        assert!(store.path().exists());

        let on_disk: LedgerSnapshot =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk, LedgerSnapshot::default());
    }

    #[test]
    fn open_creates_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileLedgerStore::open(&nested).unwrap();
        assert!(store.path().starts_with(&nested));
    }

    #[test]
    fn mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileLedgerStore::open(dir.path()).unwrap();
            store.add_points(200).unwrap();
            store.plant(&at(1)).unwrap();
            store.plant(&at(2)).unwrap();
        }
        let store = FileLedgerStore::open(dir.path()).unwrap();
        assert_eq!(store.balance(), 1700 - 2 * TREE_COST);
        let events = store.plant_events();
        assert_eq!(events, vec![event(1), event(2)]);
    }

    #[test]
    fn rejected_plant_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLedgerStore::open(dir.path()).unwrap();
        store.add_points(-700).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let err = store.plant(&at(0)).unwrap_err();
        assert!(matches!(
            err.as_ledger(),
            Some(LedgerError::InsufficientFunds { balance: 800, .. })
        ));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
        assert_eq!(store.balance(), 800);
    }

    #[test]
    fn corrupt_snapshot_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SNAPSHOT_FILE), "{not json").unwrap();
        let err = FileLedgerStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn empty_snapshot_file_reads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SNAPSHOT_FILE), "").unwrap();
        let store = FileLedgerStore::open(dir.path()).unwrap();
        assert_eq!(store.balance(), DEFAULT_BALANCE);
    }

    #[test]
    fn imports_legacy_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LEGACY_POINTS_FILE), r#"{ "points": 2300 }"#).unwrap();
        let plants = serde_json::to_string(&vec![event(3)]).unwrap();
        fs::write(dir.path().join(LEGACY_PLANTS_FILE), plants).unwrap();

        let store = FileLedgerStore::open(dir.path()).unwrap();
        assert_eq!(store.balance(), 2300);
        assert_eq!(store.plant_events(), vec![event(3)]);
        assert!(dir.path().join(SNAPSHOT_FILE).exists());
    }

    #[test]
    fn legacy_plants_without_points_uses_default_balance() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LEGACY_PLANTS_FILE), "[]").unwrap();
        let store = FileLedgerStore::open(dir.path()).unwrap();
        assert_eq!(store.balance(), DEFAULT_BALANCE);
    }

    #[test]
    fn empty_or_null_legacy_files_use_defaults() {
        for contents in ["", "  \n", "null"] {
            let dir = tempfile::tempdir().unwrap();
            fs::write(dir.path().join(LEGACY_POINTS_FILE), contents).unwrap();
            fs::write(dir.path().join(LEGACY_PLANTS_FILE), contents).unwrap();

            let store = FileLedgerStore::open(dir.path()).unwrap();
            assert_eq!(store.snapshot(), LedgerSnapshot::default(), "contents={contents:?}");
        }
    }

    #[test]
    fn null_legacy_points_keeps_plants() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LEGACY_POINTS_FILE), "null").unwrap();
        let plants = serde_json::to_string(&vec![event(4)]).unwrap();
        fs::write(dir.path().join(LEGACY_PLANTS_FILE), plants).unwrap();

        let store = FileLedgerStore::open(dir.path()).unwrap();
        assert_eq!(store.balance(), DEFAULT_BALANCE);
        assert_eq!(store.plant_events(), vec![event(4)]);
    }

    #[test]
    fn malformed_legacy_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LEGACY_POINTS_FILE), "{points").unwrap();
        let err = FileLedgerStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn failed_persist_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLedgerStore::open(dir.path()).unwrap();
        store.add_points(250).unwrap();
        let before = store.snapshot();

        // A directory in place of the snapshot makes the rename fail.
        fs::remove_file(store.path()).unwrap();
        fs::create_dir(store.path()).unwrap();

        assert!(matches!(store.add_points(100), Err(StoreError::Io(_))));
        assert!(matches!(store.plant(&at(0)), Err(StoreError::Io(_))));
        assert_eq!(store.snapshot(), before);

        fs::remove_dir(store.path()).unwrap();
        assert_eq!(store.add_points(100).unwrap(), before.points + 100);
        let reopened = FileLedgerStore::open(dir.path()).unwrap();
        assert_eq!(reopened.balance(), before.points + 100);
        assert!(reopened.plant_events().is_empty());
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLedgerStore::open(dir.path()).unwrap();
        for _ in 0..5 {
            store.add_points(1).unwrap();
        }
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec![SNAPSHOT_FILE.to_string()]);
    }
}
