//! Per-thread replay flag
//! 线程级回放标志
//!
//! While set, DDL issued by this thread is not logged again.
//! 标志置位期间，本线程发起的 DDL 不再记录日志。

use std::cell::Cell;

thread_local! {
  static REPLAYING: Cell<bool> = const { Cell::new(false) };
}

#[inline]
pub fn is_replaying() -> bool {
  REPLAYING.get()
}

/// Sets the flag, restores the previous value on drop
/// 置位标志，drop 时恢复原值
#[must_use]
pub struct Replaying {
  prev: bool,
}

impl Replaying {
  pub fn enter() -> Self {
    Self {
      prev: REPLAYING.replace(true),
    }
  }
}

impl Drop for Replaying {
  fn drop(&mut self) {
    REPLAYING.set(self.prev);
  }
}
