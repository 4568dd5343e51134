//! Post-DDL cleanup and crash recovery
//! DDL 后清理与崩溃恢复

use std::sync::atomic::Ordering;

use ddlog_base::Engine;
use ddlog_table::Isolation;
use log::info;

use crate::{FORCE_NO_UNDO_LOG_SCAN, LogDdl, Replaying, Result, Thd};

impl<E: Engine> LogDdl<E> {
  /// Replay and delete what is left for `thd` after its DDL ended
  /// `thd` 的 DDL 结束后，回放并删除其剩余记录
  pub fn post_ddl(&self, thd: &Thd) -> Result<()> {
    if self.skip(None, thd) {
      return Ok(());
    }
    if self.read_only || self.force_recovery >= FORCE_NO_UNDO_LOG_SCAN {
      return Ok(());
    }

    let thread_id = thd.id();
    info!("ddl log post ddl : begin for thread id : {thread_id}");

    let mut trx = self.table.trx();
    trx.isolation = Isolation::ReadCommitted;
    trx.ddl_operation = true;
    trx.start();

    let ids = {
      let _replaying = Replaying::enter();
      self.replay_by_thread_id(&mut trx, thread_id)?
    };
    self.delete_by_ids(&mut trx, &ids)?;
    trx.commit()?;

    info!("ddl log post ddl : end for thread id : {thread_id}");
    Ok(())
  }

  /// Replay every record left by a crash, then empty and compact the table
  /// 回放崩溃遗留的全部记录，然后清空并压缩日志表
  pub fn recover(&self) -> Result<()> {
    if self.read_only || self.force_recovery > 0 {
      return Ok(());
    }
    info!("ddl log recovery : begin");

    let mut trx = self.table.trx();
    trx.isolation = Isolation::ReadCommitted;
    trx.ddl_operation = true;
    trx.start();

    let ids = {
      let _replaying = Replaying::enter();
      self.in_recovery.store(true, Ordering::Release);
      let r = self.replay_all(&mut trx);
      self.in_recovery.store(false, Ordering::Release);
      r?
    };
    self.delete_by_ids(&mut trx, &ids)?;
    trx.commit()?;
    drop(trx);

    if !self.table.compact()? {
      info!("ddl log recovery : table busy, compaction deferred");
    }
    info!("ddl log recovery : end, {} records replayed", ids.len());
    Ok(())
  }
}
