//! Dynamic metadata buffer and persisted statistics
//! 动态元数据缓冲与持久化统计

use std::collections::HashMap;

use ddlog_base::TableId;
use parking_lot::Mutex;

use crate::Store;

#[derive(Default)]
pub(crate) struct Meta {
  /// Each buffer has its own mutex / 各缓冲各自一把锁
  dynamic: Mutex<HashMap<TableId, Vec<u8>>>,
  stats: Mutex<HashMap<String, u64>>,
}

impl Store {
  pub fn put_metadata(&self, table_id: TableId, data: Vec<u8>) {
    self.meta.dynamic.lock().insert(table_id, data);
  }

  pub fn has_metadata(&self, table_id: TableId) -> bool {
    self.meta.dynamic.lock().contains_key(&table_id)
  }

  pub(crate) fn remove_metadata(&self, table_id: TableId) -> bool {
    self.meta.dynamic.lock().remove(&table_id).is_some()
  }

  /// Row count statistics / 行数统计
  pub fn put_stats(&self, name: &str, rows: u64) {
    self.meta.stats.lock().insert(name.to_owned(), rows);
  }

  pub fn stats(&self, name: &str) -> Option<u64> {
    self.meta.stats.lock().get(name).copied()
  }

  pub(crate) fn move_stats(&self, old_name: &str, new_name: &str) {
    let mut stats = self.meta.stats.lock();
    if let Some(rows) = stats.remove(old_name) {
      stats.insert(new_name.to_owned(), rows);
    }
  }
}
