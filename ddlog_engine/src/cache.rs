//! Dictionary cache
//! 数据字典缓存

use std::collections::HashMap;

use ddlog_base::{Error, Result, TableId};
use log::info;
use parking_lot::Mutex;

use crate::Store;

/// Cached table handle / 缓存的表句柄
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cached {
  pub name: String,
  pub refs: usize,
  /// Held by an in-flight DDL / 被进行中的 DDL 占用
  pub ddl_hold: bool,
  /// Adaptive hash index entries / 自适应哈希索引条目数
  pub ahi: usize,
}

#[derive(Default)]
pub(crate) struct Cache(Mutex<HashMap<TableId, Cached>>);

impl Cache {
  pub fn rename(&self, old_name: &str, new_name: &str) {
    for c in self.0.lock().values_mut() {
      if c.name == old_name {
        c.name = new_name.to_owned();
      }
    }
  }

  pub fn release(&self, name: &str) -> bool {
    match self.0.lock().values_mut().find(|c| c.name == name) {
      Some(c) => {
        c.ddl_hold = false;
        true
      }
      None => false,
    }
  }

  pub fn evict(&self, table_id: TableId, name: &str) -> bool {
    let Some(c) = self.0.lock().remove(&table_id) else {
      return false;
    };
    info!(
      "evict {table_id} {name} : {} refs closed, {} hash entries dropped",
      c.refs, c.ahi
    );
    true
  }
}

impl Store {
  /// Open the table into the cache, one more reference
  /// 将表打开到缓存，引用加一
  pub fn open_cached(&self, table_id: TableId) -> Result<()> {
    let name = self
      .table_name(table_id)
      .ok_or_else(|| Error::TableNotFound(table_id.to_string().into()))?;
    let mut cache = self.cache.0.lock();
    let c = cache.entry(table_id).or_insert_with(|| Cached {
      name,
      ..Cached::default()
    });
    c.refs += 1;
    Ok(())
  }

  /// Mark the cached handle as held by DDL / 标记缓存句柄被 DDL 占用
  pub fn hold_cached(&self, table_id: TableId) -> bool {
    match self.cache.0.lock().get_mut(&table_id) {
      Some(c) => {
        c.ddl_hold = true;
        true
      }
      None => false,
    }
  }

  pub fn add_ahi(&self, table_id: TableId, n: usize) {
    if let Some(c) = self.cache.0.lock().get_mut(&table_id) {
      c.ahi += n;
    }
  }

  pub fn cached(&self, table_id: TableId) -> Option<Cached> {
    self.cache.0.lock().get(&table_id).cloned()
  }

  #[inline]
  pub fn is_cached(&self, table_id: TableId) -> bool {
    self.cache.0.lock().contains_key(&table_id)
  }
}
