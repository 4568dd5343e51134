//! Replay DDL log records
//! 回放 DDL 日志记录
//!
//! Every action is idempotent, so a record may be replayed any number of
//! times. Collaborator failures are logged, never returned.
//! 所有动作幂等，记录可被回放任意次。协作者错误只记日志，不返回。

use ddlog_base::{Engine, IndexId, LogId, PageNo, SpaceId, TableId, ThreadId};
use ddlog_rec::{DdlRecord, Kind};
use ddlog_table::Trx;
use log::{debug, info, warn};

use crate::{LogDdl, Result};

impl<E: Engine> LogDdl<E> {
  pub fn replay(&self, rec: &DdlRecord) {
    info!("ddl log replay : {rec}");
    if let Err(e) = self.apply(rec) {
      warn!("ddl log replay : {rec} failed, {e}");
    }
  }

  fn apply(&self, rec: &DdlRecord) -> Result<()> {
    match &rec.kind {
      Kind::FreeTree {
        space_id,
        page_no,
        index_id,
      } => self.replay_free_tree(*space_id, *page_no, *index_id),
      Kind::DeleteSpace { space_id, path } => self.replay_delete_space(*space_id, path),
      Kind::RenameSpace {
        space_id,
        old_path,
        new_path,
      } => self.replay_rename_space(*space_id, old_path, new_path),
      Kind::Drop { table_id } => self.replay_drop(*table_id),
      Kind::RenameTable {
        old_name, new_name, ..
      } => self.replay_rename_table(old_name, new_name),
      Kind::RemoveCache { table_id, name } => {
        self.replay_remove_cache(*table_id, name);
        Ok(())
      }
    }
  }

  fn replay_free_tree(&self, space_id: SpaceId, page_no: PageNo, index_id: IndexId) -> Result<()> {
    if !self.engine.space_exists(space_id) {
      info!("ddl log replay : space {space_id} not found, skip free tree {index_id}");
      return Ok(());
    }
    let _dict = self.engine.dict_mutex().lock();
    if !self.engine.free_tree(space_id, page_no, index_id)? {
      debug!("ddl log replay : tree {index_id} at {space_id}:{page_no} already freed");
    }
    Ok(())
  }

  fn replay_delete_space(&self, space_id: SpaceId, path: &str) -> Result<()> {
    let _rotation = self.engine.key_rotation_mutex().lock();
    if !self.engine.delete_space(space_id, path)? {
      info!("ddl log replay : space {space_id} {path} already deleted");
    }
    Ok(())
  }

  fn replay_rename_space(&self, space_id: SpaceId, old_path: &str, new_path: &str) -> Result<()> {
    if !self.engine.rename_space(space_id, old_path, new_path)? {
      debug!("ddl log replay : space {space_id} already at {new_path}");
    }
    Ok(())
  }

  fn replay_drop(&self, table_id: TableId) -> Result<()> {
    if !self.engine.drop_metadata(table_id)? {
      debug!("ddl log replay : no dynamic metadata for table {table_id}");
    }
    Ok(())
  }

  /// During recovery only the dictionary rename is applied
  /// 恢复期间仅应用字典层重命名
  fn replay_rename_table(&self, old_name: &str, new_name: &str) -> Result<()> {
    let in_recovery = self.is_in_recovery();
    {
      let _dict = self.engine.dict_mutex().lock();
      self.engine.rename_table(old_name, new_name)?;
      if !in_recovery {
        self.engine.release_cached(new_name);
      }
    }
    if !in_recovery {
      self.engine.rename_stats(old_name, new_name)?;
    }
    Ok(())
  }

  fn replay_remove_cache(&self, table_id: TableId, name: &str) {
    if self.is_in_recovery() {
      return;
    }
    let _dict = self.engine.dict_mutex().lock();
    if !self.engine.evict(table_id, name) {
      debug!("ddl log replay : table {table_id} {name} not cached");
    }
  }

  /// Replay every record `trx` can see, newest first; returns the replayed ids
  /// 回放 `trx` 可见的全部记录，最新在前；返回已回放的 id
  pub fn replay_all(&self, trx: &mut Trx) -> Result<Vec<LogId>> {
    let found = self.table.search(trx)?;
    for rec in &found.records {
      self.replay(rec);
    }
    Ok(found.ids)
  }

  pub fn replay_by_thread_id(&self, trx: &mut Trx, thread_id: ThreadId) -> Result<Vec<LogId>> {
    let found = self.table.search_thread(trx, thread_id)?;
    for rec in &found.records {
      self.replay(rec);
    }
    Ok(found.ids)
  }
}
