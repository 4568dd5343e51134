//! Table names in the data dictionary
//! 数据字典中的表名

use std::collections::HashMap;

use ddlog_base::{Error, Result, TableId};
use parking_lot::Mutex;

use crate::Store;

#[derive(Default)]
pub(crate) struct Names {
  by_name: Mutex<HashMap<String, TableId>>,
}

impl Store {
  pub fn create_table(&self, table_id: TableId, name: &str) -> Result<()> {
    let mut by_name = self.names.by_name.lock();
    if by_name.contains_key(name) {
      return Err(Error::TableExists(name.into()));
    }
    by_name.insert(name.to_owned(), table_id);
    Ok(())
  }

  pub fn table_id(&self, name: &str) -> Option<TableId> {
    self.names.by_name.lock().get(name).copied()
  }

  pub fn table_name(&self, table_id: TableId) -> Option<String> {
    self
      .names
      .by_name
      .lock()
      .iter()
      .find(|(_, id)| **id == table_id)
      .map(|(name, _)| name.clone())
  }

  /// Already renamed counts as done / 已重命名视为完成
  pub(crate) fn rename_name(&self, old_name: &str, new_name: &str) -> Result<()> {
    let mut by_name = self.names.by_name.lock();
    match (by_name.contains_key(old_name), by_name.contains_key(new_name)) {
      (true, true) => Err(Error::TableExists(new_name.into())),
      (true, false) => {
        if let Some(id) = by_name.remove(old_name) {
          by_name.insert(new_name.to_owned(), id);
        }
        Ok(())
      }
      (false, true) => Ok(()),
      (false, false) => Err(Error::TableNotFound(old_name.into())),
    }
  }
}
