//! Dictionary latch
//! 数据字典锁
//!
//! The dictionary mutex must never be held while the log table is latched.
//! Log-table access runs inside `unlocked`, which releases the caller's guard
//! and takes it back before returning.
//! 持有字典锁时不得对日志表加闩。日志表访问在 `unlocked` 中执行，
//! 先释放调用方的锁，返回前重新获取。

use parking_lot::MutexGuard;

/// Guard of the dictionary mutex / 字典互斥锁守卫
pub type DictGuard<'a> = MutexGuard<'a, ()>;

/// Run `f` with the dictionary latch released / 释放字典锁后执行 `f`
pub fn unlocked<R>(dict: Option<&mut DictGuard<'_>>, f: impl FnOnce() -> R) -> R {
  match dict {
    Some(guard) => MutexGuard::unlocked(guard, f),
    None => f(),
  }
}
