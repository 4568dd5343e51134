//! Delete DDL log records
//! 删除 DDL 日志记录

use ddlog_base::{DictGuard, Engine, LogId, unlocked};
use ddlog_table::{Isolation, Trx};
use log::info;

use crate::{LogDdl, Result};

impl<E: Engine> LogDdl<E> {
  /// Delete-mark one record in `trx`, read committed for the duration
  /// 在 `trx` 中删除标记一条记录，期间使用读已提交
  pub fn delete_by_id(&self, trx: &mut Trx, dict: Option<&mut DictGuard<'_>>, id: LogId) -> Result<()> {
    let isolation = trx.isolation;
    trx.isolation = Isolation::ReadCommitted;
    trx.start_if_not_started();
    let r = unlocked(dict, || self.table.remove(trx, id));
    trx.isolation = isolation;
    r?;
    info!("ddl log delete : by id {id}");
    Ok(())
  }

  pub fn delete_by_ids(&self, trx: &mut Trx, ids: &[LogId]) -> Result<()> {
    if ids.is_empty() {
      return Ok(());
    }
    trx.start_if_not_started();
    self.table.lock_ix(trx);
    self.table.remove_list(trx, ids)?;
    for id in ids {
      info!("ddl log delete : {id}");
    }
    Ok(())
  }
}
