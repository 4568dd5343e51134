#![cfg_attr(docsrs, feature(doc_cfg))]

//! Persistent DDL log table
//! 持久化 DDL 日志表
//!
//! Clustered index on `id`, secondary index on `(thread_id, id)`, both held in
//! memory and backed by one append-only file. Only committed batches reach the
//! file; a torn tail is dropped on open.
//! 聚簇索引按 `id`，二级索引按 `(thread_id, id)`，均驻留内存，由一个追加写文件持久化。
//! 只有已提交的批次落盘；打开时丢弃残缺尾部。

mod conf;
mod disk;
pub mod error;
mod index;
mod load;
mod lock;
mod rewrite;
mod state;
mod table;
mod trx;

pub use conf::Conf;
pub use error::{Error, Result};
pub use table::{Found, LogTable, Stat};
pub use trx::{Isolation, Trx};

/// Table file name / 表文件名
pub const TABLE_FILE: &str = "ddl_log.tbl";

/// OS lock file name / 进程锁文件名
pub const LOCK_FILE: &str = "ddl_log.lock";

pub(crate) const DEFAULT_COMPACT_AFTER: usize = 1024;
pub(crate) const DEFAULT_LEAF_CAP: usize = 64;
pub(crate) const MIN_LEAF_CAP: usize = 2;
