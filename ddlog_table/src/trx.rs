//! Log table transaction
//! 日志表事务
//!
//! Changes hit the indexes at once and are kept as undo (in memory) and redo
//! (frames). Commit writes the redo batch with a commit frame in one write,
//! rollback walks the undo backwards.
//! 修改立即作用于索引，同时记录 undo（内存）与 redo（帧）。提交时 redo 批次连同提交帧一次写入，回滚时逆序执行 undo。

use std::sync::{Arc, atomic::Ordering};

use ddlog_base::{LogId, ThreadId, TrxId};
use log::{debug, error, warn};

use crate::{
  LogTable, Result,
  disk::{self, KIND_COMMIT},
  table::Inner,
};

/// Isolation level of reads and delete marks
/// 读取与删除标记的隔离级别
///
/// `RepeatableRead` fixes a read view at the first read and keeps it until
/// commit or rollback. `ReadCommitted` always reads the latest commit. Rows
/// inserted by another active transaction are never seen.
/// `RepeatableRead` 在首次读取时固定读视图，保持到提交或回滚；`ReadCommitted` 总是读取最新提交。
/// 其他活跃事务插入的行始终不可见。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Isolation {
  ReadCommitted,
  #[default]
  RepeatableRead,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Undo {
  Insert { id: LogId, thread_id: ThreadId },
  ClustMark(LogId),
  SecMark(ThreadId, LogId),
}

pub struct Trx {
  pub(crate) inner: Arc<Inner>,
  id: TrxId,
  active: bool,
  /// Set by DDL writers / 由 DDL 写入方设置
  pub ddl_operation: bool,
  pub isolation: Isolation,
  pub(crate) undo: Vec<Undo>,
  pub(crate) redo: Vec<u8>,
  pub(crate) redo_frames: usize,
  pub(crate) ix: bool,
  /// Read view: commit sequence seen / 读视图：可见的提交序号
  pub(crate) view: Option<u64>,
}

impl Trx {
  pub(crate) fn new(inner: Arc<Inner>) -> Self {
    Self {
      inner,
      id: 0,
      active: false,
      ddl_operation: false,
      isolation: Isolation::default(),
      undo: Vec::new(),
      redo: Vec::new(),
      redo_frames: 0,
      ix: false,
      view: None,
    }
  }

  /// 0 until first started / 首次启动前为 0
  #[inline]
  pub fn id(&self) -> TrxId {
    self.id
  }

  #[inline]
  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn start(&mut self) {
    self.id = self.inner.trx_id.fetch_add(1, Ordering::Relaxed) + 1;
    self.active = true;
  }

  pub fn start_if_not_started(&mut self) {
    if !self.active {
      self.start();
    }
  }

  /// Table this transaction writes to / 事务所属的表
  pub fn table(&self) -> LogTable {
    LogTable(self.inner.clone())
  }

  fn finish(&mut self) {
    self.undo.clear();
    self.redo.clear();
    self.redo_frames = 0;
    if self.ix {
      self.inner.lock.unlock_ix();
      self.ix = false;
    }
    self.view = None;
    self.active = false;
    self.ddl_operation = false;
  }

  pub fn commit(&mut self) -> Result<()> {
    if !self.active {
      return Ok(());
    }
    if !self.redo.is_empty() {
      disk::push_u64(&mut self.redo, KIND_COMMIT, self.id);
      let mut st = self.inner.state.lock();
      if let Err(e) = st.append(&self.redo, self.redo_frames + 1) {
        drop(st);
        error!("ddl log trx {} : commit failed {e}", self.id);
        self.rollback();
        return Err(e.into());
      }
      let seq = self.inner.commit_seq.fetch_add(1, Ordering::AcqRel) + 1;
      for undo in &self.undo {
        if let Undo::Insert { id, .. } = undo
          && let Some(c) = st.clust.get_mut(id)
        {
          c.owner = 0;
          c.seq = seq;
        }
      }
    }
    debug!("ddl log trx {} : commit", self.id);
    self.finish();
    self.table().maybe_compact();
    Ok(())
  }

  pub fn rollback(&mut self) {
    if !self.active {
      return;
    }
    {
      let mut guard = self.inner.state.lock();
      let st = &mut *guard;
      for undo in self.undo.iter().rev() {
        match *undo {
          Undo::Insert { id, thread_id } => {
            if let Some(c) = st.clust.remove(&id)
              && c.deleted
            {
              st.marked -= 1;
            }
            st.sec.remove(&(thread_id, id));
          }
          Undo::ClustMark(id) => {
            if let Some(c) = st.clust.get_mut(&id) {
              c.deleted = false;
              st.marked -= 1;
            }
          }
          Undo::SecMark(thread_id, id) => {
            if let Some(d) = st.sec.get_mut(&(thread_id, id)) {
              *d = false;
            }
          }
        }
      }
    }
    debug!("ddl log trx {} : rollback", self.id);
    self.finish();
  }
}

impl Drop for Trx {
  fn drop(&mut self) {
    if self.active {
      warn!("ddl log trx {} : dropped while active, rollback", self.id);
      self.rollback();
    }
  }
}
