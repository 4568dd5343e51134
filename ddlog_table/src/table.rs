//! Log table handle
//! 日志表句柄

use std::{
  fs,
  path::{Path, PathBuf},
  sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
  },
};

use ddlog_base::{LogId, ThreadId};
use ddlog_rec::{DdlRecord, Row};
use log::{info, warn};
use parking_lot::Mutex;

use crate::{
  Conf, DEFAULT_COMPACT_AFTER, DEFAULT_LEAF_CAP, Error, LOCK_FILE, MIN_LEAF_CAP, Result,
  TABLE_FILE,
  disk::{self, KIND_AUTOINC, KIND_DEL_MARK, KIND_INSERT},
  load::load,
  lock::{FileLock, TableLock},
  rewrite::rewrite,
  state::{Clust, State},
  trx::{Isolation, Trx, Undo},
};

pub(crate) struct Inner {
  path: PathBuf,
  /// Mini-transaction latch / 微事务闩锁
  pub state: Mutex<State>,
  pub lock: TableLock,
  /// Last allocated id / 最后分配的 id
  autoinc: Mutex<u64>,
  pub trx_id: AtomicU64,
  /// Bumped by every commit that wrote frames / 每次写入帧的提交递增
  pub commit_seq: AtomicU64,
  compact_after: usize,
  _file_lock: FileLock,
}

/// Search result / 查询结果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Found {
  /// Newest first / 最新在前
  pub records: Vec<DdlRecord>,
  pub ids: Vec<LogId>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
  pub rows: usize,
  pub marked: usize,
  pub clust_leaves: usize,
  pub sec_leaves: usize,
  pub splits: u64,
}

#[derive(Clone)]
pub struct LogTable(pub(crate) Arc<Inner>);

impl LogTable {
  /// Open or create the table in `dir`
  /// 在 `dir` 中打开或创建表
  pub fn open(dir: &Path, conf: &[Conf]) -> Result<Self> {
    let mut compact_after = DEFAULT_COMPACT_AFTER;
    let mut leaf_cap = DEFAULT_LEAF_CAP;
    for c in conf {
      match *c {
        Conf::CompactAfter(n) => compact_after = n,
        Conf::LeafCap(n) => leaf_cap = n.max(MIN_LEAF_CAP),
      }
    }

    fs::create_dir_all(dir)?;
    let file_lock = FileLock::try_new(&dir.join(LOCK_FILE))?;
    let path = dir.join(TABLE_FILE);

    let loaded = load(&path, leaf_cap)?;
    let (file, pos, frames) = if loaded.garbage {
      rewrite(&path, loaded.autoinc, loaded.trx_id, &loaded.clust)?
    } else {
      let file = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)?;
      (file, loaded.end, loaded.frames)
    };

    info!(
      "ddl log table open : {} rows, autoinc {}",
      loaded.clust.len(),
      loaded.autoinc
    );

    Ok(Self(Arc::new(Inner {
      path,
      state: Mutex::new(State {
        clust: loaded.clust,
        sec: loaded.sec,
        file,
        pos,
        frames,
        marked: 0,
      }),
      lock: TableLock::default(),
      autoinc: Mutex::new(loaded.autoinc),
      trx_id: AtomicU64::new(loaded.trx_id),
      commit_seq: AtomicU64::new(0),
      compact_after,
      _file_lock: file_lock,
    })))
  }

  /// New transaction, not started / 新事务，未启动
  pub fn trx(&self) -> Trx {
    Trx::new(self.0.clone())
  }

  /// Intention-exclusive table lock, held until commit or rollback
  /// 意向排他表锁，持有至提交或回滚
  pub fn lock_ix(&self, trx: &mut Trx) {
    trx.start_if_not_started();
    if !trx.ix {
      self.0.lock.lock_ix();
      trx.ix = true;
    }
  }

  /// Allocate the next id, durable before return
  /// 分配下一个 id，返回前已持久化
  pub fn next_id(&self) -> Result<LogId> {
    let mut autoinc = self.0.autoinc.lock();
    let id = *autoinc + 1;
    let mut buf = Vec::new();
    disk::push_u64(&mut buf, KIND_AUTOINC, id);
    self.0.state.lock().append(&buf, 1)?;
    *autoinc = id;
    Ok(id)
  }

  pub fn insert(&self, trx: &mut Trx, rec: &DdlRecord) -> Result<()> {
    self.lock_ix(trx);
    let row = Row::from(rec);
    let mut row_buf = Vec::new();
    row.encode(&mut row_buf);

    {
      let mut st = self.0.state.lock();
      let clust = Clust {
        row,
        deleted: false,
        owner: trx.id(),
        seq: 0,
      };
      if st.clust.insert_with_retry(rec.id, clust).is_err() {
        return Err(Error::Duplicate(rec.id));
      }
      if st.sec.insert_with_retry((rec.thread_id, rec.id), false).is_err() {
        st.clust.remove(&rec.id);
        return Err(Error::Duplicate(rec.id));
      }
    }

    trx.undo.push(Undo::Insert {
      id: rec.id,
      thread_id: rec.thread_id,
    });
    disk::push(&mut trx.redo, KIND_INSERT, &row_buf);
    trx.redo_frames += 1;
    Ok(())
  }

  /// Read view of `trx`, fixed at its first read under `RepeatableRead`
  /// `trx` 的读视图，`RepeatableRead` 下于首次读取时固定
  fn view(&self, trx: &mut Trx) -> Option<u64> {
    match trx.isolation {
      Isolation::ReadCommitted => None,
      Isolation::RepeatableRead => Some(
        *trx
          .view
          .get_or_insert_with(|| self.0.commit_seq.load(Ordering::Acquire)),
      ),
    }
  }

  /// Delete-mark one row. A clustered miss is success, a secondary miss is corruption.
  /// Rows `trx` cannot see count as a miss.
  /// 删除标记一行。聚簇索引未命中视为成功，二级索引未命中视为损坏。`trx` 不可见的行视为未命中。
  pub fn remove(&self, trx: &mut Trx, id: LogId) -> Result<()> {
    self.lock_ix(trx);
    let trx_id = trx.id();
    let mut guard = self.0.state.lock();
    let view = self.view(trx);
    let st = &mut *guard;

    let Some(c) = st.clust.get_mut(&id) else {
      return Ok(());
    };
    if !c.visible(trx_id, view) {
      return Ok(());
    }
    let thread_id = c.row.thread_id().ok_or(Error::Corrupt(id))?;
    let mut marked = false;
    if !c.deleted {
      c.deleted = true;
      st.marked += 1;
      trx.undo.push(Undo::ClustMark(id));
      marked = true;
    }

    let Some(d) = st.sec.get_mut(&(thread_id, id)) else {
      return Err(Error::Corrupt(id));
    };
    if !*d {
      *d = true;
      trx.undo.push(Undo::SecMark(thread_id, id));
      marked = true;
    }

    if marked {
      disk::push_u64(&mut trx.redo, KIND_DEL_MARK, id);
      trx.redo_frames += 1;
    }
    Ok(())
  }

  /// Remove in order, stop at the first error
  /// 按序删除，遇到首个错误即停止
  pub fn remove_list(&self, trx: &mut Trx, ids: &[LogId]) -> Result<()> {
    for &id in ids {
      self.remove(trx, id)?;
    }
    Ok(())
  }

  /// Live records `trx` can see, newest first
  /// `trx` 可见的全部有效记录，最新在前
  pub fn search(&self, trx: &mut Trx) -> Result<Found> {
    let st = self.0.state.lock();
    let view = self.view(trx);
    let trx_id = trx.id();
    let mut found = Found::default();
    for (id, c) in st.clust.iter().rev() {
      if c.deleted || !c.visible(trx_id, view) {
        continue;
      }
      found.records.push(DdlRecord::from_row(&c.row)?);
      found.ids.push(*id);
    }
    Ok(found)
  }

  /// Records of one thread `trx` can see: ids ascending, records newest first
  /// `trx` 可见的某线程记录：id 升序，记录最新在前
  pub fn search_thread(&self, trx: &mut Trx, thread_id: ThreadId) -> Result<Found> {
    let st = self.0.state.lock();
    let view = self.view(trx);
    let trx_id = trx.id();
    let mut rows = Vec::new();
    for ((_, id), deleted) in st.sec.range((thread_id, 0)..=(thread_id, LogId::MAX)) {
      if *deleted {
        continue;
      }
      if let Some(c) = st.clust.get(id)
        && !c.deleted
        && c.visible(trx_id, view)
      {
        rows.push((*id, &c.row));
      }
    }

    let ids = rows.iter().map(|(id, _)| *id).collect();
    let mut records = Vec::with_capacity(rows.len());
    for (_, row) in rows.iter().rev() {
      records.push(DdlRecord::from_row(row)?);
    }
    Ok(Found { records, ids })
  }

  /// Purge delete-marked rows and rewrite the file.
  /// Skipped (`false`) while any transaction holds IX.
  /// 清除删除标记行并重写文件。有事务持有 IX 时跳过（返回 `false`）。
  pub fn compact(&self) -> Result<bool> {
    let Some(_x) = self.0.lock.try_x() else {
      return Ok(false);
    };
    let autoinc = self.0.autoinc.lock();
    let mut st = self.0.state.lock();
    let purged = st.purge();
    let trx_id = self.0.trx_id.load(Ordering::Relaxed);
    let (file, pos, frames) = rewrite(&self.0.path, *autoinc, trx_id, &st.clust)?;
    st.file = file;
    st.pos = pos;
    st.frames = frames;
    info!("ddl log table compact : purged {purged}, {} rows", st.clust.len());
    Ok(true)
  }

  pub(crate) fn maybe_compact(&self) {
    let marked = self.0.state.lock().marked;
    if marked >= self.0.compact_after
      && let Err(e) = self.compact()
    {
      warn!("ddl log table compact : {e}");
    }
  }

  /// Live rows / 有效行数
  pub fn len(&self) -> usize {
    self.0.state.lock().live()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Last allocated id / 最后分配的 id
  pub fn autoinc(&self) -> u64 {
    *self.0.autoinc.lock()
  }

  pub fn stat(&self) -> Stat {
    let st = self.0.state.lock();
    Stat {
      rows: st.live(),
      marked: st.marked,
      clust_leaves: st.clust.leaves(),
      sec_leaves: st.sec.leaves(),
      splits: st.clust.splits() + st.sec.splits(),
    }
  }
}

#[cfg(test)]
mod tests {
  use ddlog_rec::Kind;

  use super::*;

  #[test]
  fn test_secondary_miss_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let table = LogTable::open(dir.path(), &[]).unwrap();
    let mut trx = table.trx();
    let id = table.next_id().unwrap();
    table
      .insert(&mut trx, &DdlRecord::new(id, 3, Kind::Drop { table_id: 1 }))
      .unwrap();
    trx.commit().unwrap();

    table.0.state.lock().sec.remove(&(3, id));
    let mut trx = table.trx();
    assert!(matches!(table.remove(&mut trx, id), Err(Error::Corrupt(i)) if i == id));
    trx.rollback();
    assert_eq!(table.len(), 1);
  }
}
