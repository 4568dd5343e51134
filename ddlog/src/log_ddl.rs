//! DDL log service
//! DDL 日志服务

use std::{
  path::Path,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use ddlog_base::{DictGuard, Engine, LogId, Table, ThreadId, unlocked};
use ddlog_table::LogTable;
use log::info;

use crate::{Conf, Result, Thd, is_replaying};

/// From this forced recovery level on, `post_ddl` does nothing
/// 从此强制恢复级别起，`post_ddl` 不做任何事
pub const FORCE_NO_UNDO_LOG_SCAN: u8 = 5;

pub struct LogDdl<E: Engine> {
  pub(crate) table: LogTable,
  pub(crate) engine: Arc<E>,
  /// Set while `recover` replays / `recover` 回放期间置位
  pub(crate) in_recovery: AtomicBool,
  /// Redo recovery running / 重做恢复进行中
  recv_on: AtomicBool,
  pub(crate) read_only: bool,
  pub(crate) force_recovery: u8,
}

impl<E: Engine> LogDdl<E> {
  pub fn open(dir: &Path, engine: Arc<E>, conf: &[Conf]) -> Result<Self> {
    let mut read_only = false;
    let mut force_recovery = 0;
    let mut table_conf = Vec::new();
    for c in conf {
      match *c {
        Conf::ReadOnly => read_only = true,
        Conf::ForceRecovery(n) => force_recovery = n,
        Conf::Table(t) => table_conf.push(t),
      }
    }

    let table = LogTable::open(dir, &table_conf)?;
    info!(
      "ddl log open : {} records, read only {read_only}, force recovery {force_recovery}",
      table.len()
    );
    Ok(Self {
      table,
      engine,
      in_recovery: AtomicBool::new(false),
      recv_on: AtomicBool::new(false),
      read_only,
      force_recovery,
    })
  }

  #[inline]
  pub fn table(&self) -> &LogTable {
    &self.table
  }

  #[inline]
  pub fn engine(&self) -> &Arc<E> {
    &self.engine
  }

  pub fn thd(&self, id: ThreadId) -> Thd {
    Thd::new(id, false, self.table.trx())
  }

  pub fn bootstrap_thd(&self, id: ThreadId) -> Thd {
    Thd::new(id, true, self.table.trx())
  }

  /// Mark redo recovery as running / 标记重做恢复进行中
  pub fn set_recovery_on(&self, on: bool) {
    self.recv_on.store(on, Ordering::Release);
  }

  #[inline]
  pub fn is_in_recovery(&self) -> bool {
    self.in_recovery.load(Ordering::Acquire)
  }

  /// Whether DDL on `table` by `thd` goes unlogged
  /// `thd` 对 `table` 的 DDL 是否不记日志
  pub fn skip(&self, table: Option<&Table>, thd: &Thd) -> bool {
    self.recv_on.load(Ordering::Acquire)
      || table.is_some_and(|t| t.temporary)
      || thd.is_bootstrap()
      || is_replaying()
  }

  /// Allocate an id with the dictionary latch released
  /// 释放字典锁后分配 id
  pub(crate) fn next_id(&self, dict: Option<&mut DictGuard<'_>>) -> Result<LogId> {
    Ok(unlocked(dict, || self.table.next_id())?)
  }
}
