//! Worker thread handle
//! 工作线程句柄

use ddlog_base::ThreadId;
use ddlog_table::Trx;

pub struct Thd {
  id: ThreadId,
  bootstrap: bool,
  /// DDL transaction of this thread / 本线程的 DDL 事务
  pub trx: Trx,
}

impl Thd {
  pub(crate) fn new(id: ThreadId, bootstrap: bool, trx: Trx) -> Self {
    Self { id, bootstrap, trx }
  }

  #[inline]
  pub fn id(&self) -> ThreadId {
    self.id
  }

  /// Bootstrap threads never log / 引导线程不记日志
  #[inline]
  pub fn is_bootstrap(&self) -> bool {
    self.bootstrap
  }
}
