use std::{sync::Arc, thread};

use aok::{OK, Void};
use ddlog_base::{FIL_NULL, Index, Table, unlocked};
use log::info;
use parking_lot::Mutex;

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

#[test]
fn test_unlocked_releases_latch() -> Void {
  let dict = Arc::new(Mutex::new(()));
  let mut guard = dict.lock();

  let seen = unlocked(Some(&mut guard), || {
    // Another thread can take the latch now 其他线程此时可获取锁
    let dict = dict.clone();
    thread::spawn(move || dict.try_lock().is_some()).join().unwrap()
  });
  assert!(seen);

  // Reacquired on return 返回时已重新持有
  assert!(dict.try_lock().is_none());
  drop(guard);
  assert!(dict.try_lock().is_some());
  info!("unlocked ok");
  OK
}

#[test]
fn test_unlocked_without_guard() {
  let n = unlocked(None, || 7);
  assert_eq!(n, 7);
}

#[test]
fn test_handles() {
  let table = Table::new(42, "db/t1", 7);
  assert!(!table.temporary);
  assert!(table.clone().temporary().temporary);

  let index = Index::fulltext(9, 7);
  assert!(index.fulltext);
  assert_eq!(index.page_no, FIL_NULL);
  assert_eq!(Index::new(9, 7, 3).page_no, 3);
}
