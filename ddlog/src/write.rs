//! Write DDL log records
//! 写入 DDL 日志记录
//!
//! Drop-style records go into the caller's transaction and vanish with its
//! rollback. Create-style records are committed at once by a background
//! transaction, then delete-marked in the caller's: commit removes them,
//! rollback leaves them for `post_ddl` to undo the half-done DDL.
//! 删除类记录写入调用方事务，随其回滚而消失。创建类记录由后台事务立即提交，
//! 再在调用方事务中删除标记：提交即删除，回滚则留给 `post_ddl` 撤销未完成的 DDL。

use ddlog_base::{DictGuard, Engine, Index, LogId, SpaceId, Table, TableId, ThreadId, unlocked};
use ddlog_rec::{DdlRecord, Kind};
use ddlog_table::Trx;
use log::info;

use crate::{LogDdl, Result, Thd};

impl<E: Engine> LogDdl<E> {
  /// Insert in `trx`, or in a background transaction committed before return
  /// 在 `trx` 中插入，或在返回前已提交的后台事务中插入
  fn insert(&self, trx: Option<&mut Trx>, dict: Option<&mut DictGuard<'_>>, rec: DdlRecord) -> Result<()> {
    unlocked(dict, || -> Result<()> {
      match trx {
        Some(trx) => {
          trx.start_if_not_started();
          self.table.insert(trx, &rec)?;
        }
        None => {
          let mut trx = self.table.trx();
          trx.ddl_operation = true;
          trx.start();
          self.table.insert(&mut trx, &rec)?;
          trx.commit()?;
        }
      }
      Ok(())
    })?;
    info!("ddl log insert : {rec}");
    Ok(())
  }

  pub fn write_free_tree_log(
    &self,
    thd: &mut Thd,
    mut dict: Option<&mut DictGuard<'_>>,
    table: &Table,
    index: &Index,
    is_drop: bool,
  ) -> Result<()> {
    if self.skip(Some(table), thd) {
      return Ok(());
    }
    // No B-tree behind a fulltext index 全文索引没有 B 树
    if index.fulltext {
      return Ok(());
    }
    thd.trx.ddl_operation = true;
    let id = self.next_id(dict.as_deref_mut())?;
    let thread_id = thd.id();

    if is_drop {
      self.insert_free_tree_log(Some(&mut thd.trx), dict, id, thread_id, index)
    } else {
      self.insert_free_tree_log(None, dict.as_deref_mut(), id, thread_id, index)?;
      self.delete_by_id(&mut thd.trx, dict, id)
    }
  }

  pub fn insert_free_tree_log(
    &self,
    trx: Option<&mut Trx>,
    dict: Option<&mut DictGuard<'_>>,
    id: LogId,
    thread_id: ThreadId,
    index: &Index,
  ) -> Result<()> {
    let kind = Kind::FreeTree {
      space_id: index.space_id,
      page_no: index.page_no,
      index_id: index.id,
    };
    self.insert(trx, dict, DdlRecord::new(id, thread_id, kind))
  }

  pub fn write_delete_space_log(
    &self,
    thd: &mut Thd,
    mut dict: Option<&mut DictGuard<'_>>,
    table: Option<&Table>,
    space_id: SpaceId,
    path: &str,
    is_drop: bool,
  ) -> Result<()> {
    if self.skip(table, thd) {
      return Ok(());
    }
    thd.trx.ddl_operation = true;
    let id = self.next_id(dict.as_deref_mut())?;
    let thread_id = thd.id();

    if is_drop {
      self.insert_delete_space_log(Some(&mut thd.trx), dict, id, thread_id, space_id, path)
    } else {
      self.insert_delete_space_log(None, dict.as_deref_mut(), id, thread_id, space_id, path)?;
      self.delete_by_id(&mut thd.trx, dict, id)
    }
  }

  pub fn insert_delete_space_log(
    &self,
    trx: Option<&mut Trx>,
    dict: Option<&mut DictGuard<'_>>,
    id: LogId,
    thread_id: ThreadId,
    space_id: SpaceId,
    path: &str,
  ) -> Result<()> {
    let kind = Kind::DeleteSpace {
      space_id,
      path: path.to_owned(),
    };
    self.insert(trx, dict, DdlRecord::new(id, thread_id, kind))
  }

  /// No thread means startup recovery, nothing to log
  /// 无线程表示启动恢复阶段，不记日志
  pub fn write_rename_space_log(
    &self,
    thd: Option<&mut Thd>,
    mut dict: Option<&mut DictGuard<'_>>,
    space_id: SpaceId,
    old_path: &str,
    new_path: &str,
  ) -> Result<()> {
    let Some(thd) = thd else {
      return Ok(());
    };
    if self.skip(None, thd) {
      return Ok(());
    }
    thd.trx.ddl_operation = true;
    let id = self.next_id(dict.as_deref_mut())?;
    self.insert_rename_space_log(
      None,
      dict.as_deref_mut(),
      id,
      thd.id(),
      space_id,
      old_path,
      new_path,
    )?;
    self.delete_by_id(&mut thd.trx, dict, id)
  }

  #[allow(clippy::too_many_arguments)]
  pub fn insert_rename_space_log(
    &self,
    trx: Option<&mut Trx>,
    dict: Option<&mut DictGuard<'_>>,
    id: LogId,
    thread_id: ThreadId,
    space_id: SpaceId,
    old_path: &str,
    new_path: &str,
  ) -> Result<()> {
    let kind = Kind::RenameSpace {
      space_id,
      old_path: old_path.to_owned(),
      new_path: new_path.to_owned(),
    };
    self.insert(trx, dict, DdlRecord::new(id, thread_id, kind))
  }

  /// Kept in the caller's transaction / 保留在调用方事务中
  pub fn write_drop_log(
    &self,
    thd: &mut Thd,
    mut dict: Option<&mut DictGuard<'_>>,
    table_id: TableId,
  ) -> Result<()> {
    if self.skip(None, thd) {
      return Ok(());
    }
    thd.trx.ddl_operation = true;
    let id = self.next_id(dict.as_deref_mut())?;
    let thread_id = thd.id();
    self.insert_drop_log(Some(&mut thd.trx), dict, id, thread_id, table_id)
  }

  pub fn insert_drop_log(
    &self,
    trx: Option<&mut Trx>,
    dict: Option<&mut DictGuard<'_>>,
    id: LogId,
    thread_id: ThreadId,
    table_id: TableId,
  ) -> Result<()> {
    self.insert(trx, dict, DdlRecord::new(id, thread_id, Kind::Drop { table_id }))
  }

  pub fn write_rename_table_log(
    &self,
    thd: &mut Thd,
    mut dict: Option<&mut DictGuard<'_>>,
    table: &Table,
    old_name: &str,
    new_name: &str,
  ) -> Result<()> {
    if self.skip(Some(table), thd) {
      return Ok(());
    }
    thd.trx.ddl_operation = true;
    let id = self.next_id(dict.as_deref_mut())?;
    self.insert_rename_table_log(
      None,
      dict.as_deref_mut(),
      id,
      thd.id(),
      table.id,
      old_name,
      new_name,
    )?;
    self.delete_by_id(&mut thd.trx, dict, id)
  }

  #[allow(clippy::too_many_arguments)]
  pub fn insert_rename_table_log(
    &self,
    trx: Option<&mut Trx>,
    dict: Option<&mut DictGuard<'_>>,
    id: LogId,
    thread_id: ThreadId,
    table_id: TableId,
    old_name: &str,
    new_name: &str,
  ) -> Result<()> {
    let kind = Kind::RenameTable {
      table_id,
      old_name: old_name.to_owned(),
      new_name: new_name.to_owned(),
    };
    self.insert(trx, dict, DdlRecord::new(id, thread_id, kind))
  }

  pub fn write_remove_cache_log(
    &self,
    thd: &mut Thd,
    mut dict: Option<&mut DictGuard<'_>>,
    table: &Table,
  ) -> Result<()> {
    if self.skip(Some(table), thd) {
      return Ok(());
    }
    thd.trx.ddl_operation = true;
    let id = self.next_id(dict.as_deref_mut())?;
    self.insert_remove_cache_log(None, dict.as_deref_mut(), id, thd.id(), table.id, &table.name)?;
    self.delete_by_id(&mut thd.trx, dict, id)
  }

  pub fn insert_remove_cache_log(
    &self,
    trx: Option<&mut Trx>,
    dict: Option<&mut DictGuard<'_>>,
    id: LogId,
    thread_id: ThreadId,
    table_id: TableId,
    name: &str,
  ) -> Result<()> {
    let kind = Kind::RemoveCache {
      table_id,
      name: name.to_owned(),
    };
    self.insert(trx, dict, DdlRecord::new(id, thread_id, kind))
  }
}
