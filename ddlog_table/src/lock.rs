//! Table locks
//! 表锁
//!
//! `FileLock` keeps other processes off the table directory. `TableLock` is
//! the in-process IX/X table lock: IX is shared among transactions, X is only
//! ever tried.
//! `FileLock` 防止其他进程打开同一目录。`TableLock` 为进程内 IX/X 表锁：IX 在事务间共享，X 只做尝试获取。

use std::{fs, path::Path};

use parking_lot::{Condvar, Mutex};

use crate::{Error, Result};

/// Exclusive OS lock, released when the file closes
/// 排他系统锁，文件关闭时释放
pub(crate) struct FileLock {
  _lock: fd_lock::RwLock<fs::File>,
}

impl FileLock {
  pub fn try_new(path: &Path) -> Result<Self> {
    let file = fs::OpenOptions::new()
      .read(true)
      .write(true)
      .create(true)
      .truncate(false)
      .open(path)?;
    let mut lock = fd_lock::RwLock::new(file);
    let guard = lock.try_write().map_err(|_| Error::Locked)?;
    // Held until the descriptor is closed 持有至描述符关闭
    std::mem::forget(guard);
    Ok(Self { _lock: lock })
  }
}

#[derive(Default)]
struct Mode {
  ix: usize,
  x: bool,
}

#[derive(Default)]
pub(crate) struct TableLock {
  mode: Mutex<Mode>,
  cond: Condvar,
}

impl TableLock {
  /// Wait while X is held / X 被持有时等待
  pub fn lock_ix(&self) {
    let mut mode = self.mode.lock();
    while mode.x {
      self.cond.wait(&mut mode);
    }
    mode.ix += 1;
  }

  pub fn unlock_ix(&self) {
    let mut mode = self.mode.lock();
    mode.ix = mode.ix.saturating_sub(1);
    if mode.ix == 0 {
      self.cond.notify_all();
    }
  }

  /// `None` while any IX is held / 存在 IX 时返回 `None`
  pub fn try_x(&self) -> Option<XGuard<'_>> {
    let mut mode = self.mode.lock();
    if mode.ix > 0 || mode.x {
      return None;
    }
    mode.x = true;
    Some(XGuard(self))
  }

  #[cfg(test)]
  pub fn ix_count(&self) -> usize {
    self.mode.lock().ix
  }
}

pub(crate) struct XGuard<'a>(&'a TableLock);

impl Drop for XGuard<'_> {
  fn drop(&mut self) {
    self.0.mode.lock().x = false;
    self.0.cond.notify_all();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_x_excludes_ix() {
    let lock = TableLock::default();
    lock.lock_ix();
    lock.lock_ix();
    assert!(lock.try_x().is_none());
    lock.unlock_ix();
    lock.unlock_ix();
    let x = lock.try_x();
    assert!(x.is_some());
    assert!(lock.try_x().is_none());
    drop(x);
    lock.lock_ix();
    assert_eq!(lock.ix_count(), 1);
  }
}
