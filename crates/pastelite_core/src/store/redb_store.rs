//! Record store backed by a single redb table.

use super::RecordStore;
use crate::constants::REDB_FILE_NAME;
use crate::error::AppError;
use redb::{ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

/// Record rows keyed by store key (`paste:<id>`), values opaque bytes.
const RECORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("records");

/// Persistent record store; every `set`/`delete` is its own write transaction.
pub struct RedbStore {
    db: Arc<redb::Database>,
}

impl RedbStore {
    /// Open (or create) `<path>/data.redb` and ensure the records table exists.
    ///
    /// # Arguments
    /// - `path`: Database directory.
    ///
    /// # Returns
    /// A ready [`RedbStore`].
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created, the file is held
    /// by another process, or table initialization fails.
    pub fn open(path: &str) -> Result<Self, AppError> {
        let dir = Path::new(path);
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create database directory '{}': {}",
                dir.display(),
                err
            ))
        })?;
        let file = dir.join(REDB_FILE_NAME);
        let db = match redb::Database::create(&file) {
            Ok(db) => db,
            Err(redb::DatabaseError::DatabaseAlreadyOpen) => {
                return Err(AppError::StorageMessage(format!(
                    "Database '{}' is already open in another process.\n\
                    Stop the other Pastelite instance or set DB_PATH to a different location.",
                    file.display()
                )));
            }
            Err(err) => return Err(err.into()),
        };
        Self::from_shared(Arc::new(db))
    }

    /// Wrap an already-open redb database.
    ///
    /// # Errors
    /// Returns an error when the records table cannot be initialized.
    pub fn from_shared(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(RECORDS)?;
        write_txn.commit()?;
        Ok(Self { db })
    }
}

impl RecordStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        let read_txn = self.db.begin_read()?;
        let records = read_txn.open_table(RECORDS)?;
        Ok(records.get(key)?.map(|value| value.value().to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), AppError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut records = write_txn.open_table(RECORDS)?;
            records.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, AppError> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut records = write_txn.open_table(RECORDS)?;
            let removed = records.remove(key)?;
            removed.is_some()
        };
        write_txn.commit()?;
        Ok(existed)
    }

    fn ping(&self) -> Result<(), AppError> {
        let read_txn = self.db.begin_read()?;
        read_txn.open_table(RECORDS)?;
        Ok(())
    }
}
