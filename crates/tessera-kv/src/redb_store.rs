//! Persistent [`KvStore`] backed by the redb embedded database.
//!
//! All keys live in a single `&[u8] -> &[u8]` table. A [`RedbTransaction`]
//! wraps one `redb::WriteTransaction`; redb serializes write transactions, so
//! commits never report [`KvError::Conflict`].
//!
//! The table is opened per operation rather than held for the lifetime of the
//! transaction. redb allows a table to be open only once per transaction, and
//! a long-lived range iterator would keep it borrowed, which would make
//! deleting the current key during a scan impossible.

use std::ops::Bound;
use std::path::Path;
use std::sync::Arc;

use redb::Database;
use redb::ReadableTable;
use redb::TableDefinition;
use redb::WriteTransaction;
use snafu::ResultExt;
use tracing::debug;

use crate::cursor::is_empty_range;
use crate::error::AbortSnafu;
use crate::error::BeginWriteSnafu;
use crate::error::CommitSnafu;
use crate::error::GetSnafu;
use crate::error::InsertSnafu;
use crate::error::KvError;
use crate::error::OpenDatabaseSnafu;
use crate::error::OpenTableSnafu;
use crate::error::RangeSnafu;
use crate::error::RemoveSnafu;
use crate::traits::KeyValue;
use crate::traits::KvStore;
use crate::traits::Transaction;
use crate::validation::check_key;
use crate::validation::check_write;

/// Table holding every key written through this store.
const DATA_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("tessera_data");

/// Redb-backed store.
///
/// Cloning shares the underlying database handle.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Create or open the database file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, KvError> {
        let path = path.as_ref();
        let db = Database::create(path).context(OpenDatabaseSnafu { path })?;

        // Create the data table up front so read paths never race its creation.
        let txn = db.begin_write().context(BeginWriteSnafu)?;
        txn.open_table(DATA_TABLE).context(OpenTableSnafu)?;
        txn.commit().context(CommitSnafu)?;

        debug!(path = %path.display(), "opened redb store");
        Ok(Self { db: Arc::new(db) })
    }
}

impl KvStore for RedbStore {
    type Txn = RedbTransaction;

    fn begin(&self) -> Result<RedbTransaction, KvError> {
        let txn = self.db.begin_write().context(BeginWriteSnafu)?;
        Ok(RedbTransaction { txn })
    }
}

/// Transaction over a [`RedbStore`].
///
/// Dropping without committing aborts the underlying redb transaction.
pub struct RedbTransaction {
    txn: WriteTransaction,
}

impl Transaction for RedbTransaction {
    fn get(&self, key: &[u8]) -> Result<Vec<u8>, KvError> {
        let table = self.txn.open_table(DATA_TABLE).context(OpenTableSnafu)?;
        let value = table.get(key).context(GetSnafu)?.map(|guard| guard.value().to_vec());
        value.ok_or_else(|| KvError::NotFound { key: key.to_vec() })
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), KvError> {
        check_write(key, value)?;
        let mut table = self.txn.open_table(DATA_TABLE).context(OpenTableSnafu)?;
        table.insert(key, value).context(InsertSnafu)?;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KvError> {
        check_key(key)?;
        let mut table = self.txn.open_table(DATA_TABLE).context(OpenTableSnafu)?;
        table.remove(key).context(RemoveSnafu)?;
        Ok(())
    }

    fn seek(&self, lower: Bound<&[u8]>, upper: Option<&[u8]>) -> Result<Option<KeyValue>, KvError> {
        if is_empty_range(lower, upper) {
            return Ok(None);
        }
        let upper_bound = upper.map_or(Bound::Unbounded, Bound::Excluded);

        let table = self.txn.open_table(DATA_TABLE).context(OpenTableSnafu)?;
        let mut range = table.range::<&[u8]>((lower, upper_bound)).context(RangeSnafu)?;
        let Some(entry) = range.next() else {
            return Ok(None);
        };
        let (key, value) = entry.context(RangeSnafu)?;
        let found = KeyValue {
            key: key.value().to_vec(),
            value: value.value().to_vec(),
        };
        Ok(Some(found))
    }

    fn commit(self) -> Result<(), KvError> {
        self.txn.commit().context(CommitSnafu)
    }

    fn rollback(self) -> Result<(), KvError> {
        self.txn.abort().context(AbortSnafu)
    }
}
