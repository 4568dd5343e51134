//! Latched table state
//! 受闩锁保护的表状态

use std::{
  fs::File,
  io::{Seek, SeekFrom, Write},
};

use ddlog_base::{LogId, ThreadId, TrxId};
use ddlog_rec::Row;
use log::error;

use crate::index::Index;

/// Clustered entry / 聚簇索引条目
#[derive(Debug, Clone)]
pub(crate) struct Clust {
  pub row: Row,
  pub deleted: bool,
  /// Inserting trx while uncommitted, 0 once committed
  /// 未提交时为插入事务 id，提交后为 0
  pub owner: TrxId,
  /// Commit sequence of the insert, 0 for rows read from disk
  /// 插入的提交序号，从磁盘加载的行为 0
  pub seq: u64,
}

impl Clust {
  pub fn committed(row: Row) -> Self {
    Self {
      row,
      deleted: false,
      owner: 0,
      seq: 0,
    }
  }

  /// Seen by `trx_id` through `view` (`None` reads the latest commit)
  /// `trx_id` 经由 `view` 是否可见（`None` 读最新提交）
  #[inline]
  pub fn visible(&self, trx_id: TrxId, view: Option<u64>) -> bool {
    if self.owner != 0 {
      return self.owner == trx_id;
    }
    view.is_none_or(|v| self.seq <= v)
  }
}

pub(crate) type ClustIndex = Index<LogId, Clust>;

/// Secondary entry value is the delete mark / 二级索引值为删除标记
pub(crate) type SecIndex = Index<(ThreadId, LogId), bool>;

fn write_at(file: &mut File, pos: u64, buf: &[u8]) -> std::io::Result<()> {
  file.seek(SeekFrom::Start(pos))?;
  file.write_all(buf)?;
  file.sync_data()
}

pub(crate) struct State {
  pub clust: ClustIndex,
  pub sec: SecIndex,
  pub file: File,
  /// End of valid data / 有效数据末尾
  pub pos: u64,
  /// Frames in file / 文件中的帧数
  pub frames: usize,
  /// Delete-marked clustered rows / 已删除标记的聚簇行数
  pub marked: usize,
}

impl State {
  /// Write at `pos` and sync; on failure cut the file back
  /// 在 `pos` 处写入并同步；失败则截回
  pub fn append(&mut self, buf: &[u8], frames: usize) -> std::io::Result<()> {
    match write_at(&mut self.file, self.pos, buf) {
      Ok(()) => {
        self.pos += buf.len() as u64;
        self.frames += frames;
        Ok(())
      }
      Err(e) => {
        if let Err(cut) = self.file.set_len(self.pos) {
          error!("ddl log table : truncate to {} failed {cut}", self.pos);
        }
        Err(e)
      }
    }
  }

  /// Live rows / 有效行数
  #[inline]
  pub fn live(&self) -> usize {
    self.clust.len() - self.marked
  }

  /// Physically drop committed delete-marked rows
  /// 物理删除已提交的删除标记行
  pub fn purge(&mut self) -> usize {
    let dead: Vec<(LogId, Option<ThreadId>)> = self
      .clust
      .iter()
      .filter(|(_, c)| c.deleted)
      .map(|(id, c)| (*id, c.row.thread_id()))
      .collect();
    for (id, thread_id) in &dead {
      self.clust.remove(id);
      if let Some(thread_id) = thread_id {
        self.sec.remove(&(*thread_id, *id));
      }
    }
    self.marked = 0;
    dead.len()
  }
}
