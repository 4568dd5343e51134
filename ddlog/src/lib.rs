#![cfg_attr(docsrs, feature(doc_cfg))]

//! ddlog - Crash-safe DDL log
//! 崩溃安全的 DDL 日志
//!
//! DDL execution records what must happen to physical objects before it
//! touches them. After the DDL ends, `post_ddl` replays what is left for the
//! thread; after a crash, `recover` replays everything.
//! DDL 执行在改动物理对象前先记录待办操作。DDL 结束后 `post_ddl` 回放该线程剩余记录；
//! 崩溃后 `recover` 回放全部记录。

mod conf;
mod del;
pub mod error;
mod log_ddl;
mod post;
mod replay;
mod replaying;
mod thd;
mod write;

pub use conf::Conf;
pub use ddlog_base::{DictGuard, Engine, Index, Table};
pub use ddlog_rec::{DdlRecord, Kind, LogType};
pub use ddlog_table::{Isolation, LogTable, Trx};
pub use error::{Error, Result};
pub use log_ddl::{FORCE_NO_UNDO_LOG_SCAN, LogDdl};
pub use replaying::{Replaying, is_replaying};
pub use thd::Thd;
