#![cfg_attr(docsrs, feature(doc_cfg))]

//! ddlog_base - Shared types for the DDL log
//! DDL 日志共享类型
//!
//! Ids, table/index handles, the dictionary latch helper and the
//! `Engine` trait through which replay reaches the storage engine.
//! 包含 ID、表/索引句柄、字典锁辅助函数，以及回放访问存储引擎的 `Engine` trait。

mod consts;
mod dict;
mod engine;
pub mod error;
mod handle;
mod id;

pub use consts::FIL_NULL;
pub use dict::{DictGuard, unlocked};
pub use engine::Engine;
pub use error::{Error, Result};
pub use handle::{Index, Table};
pub use id::{IndexId, LogId, PageNo, SpaceId, TableId, ThreadId, TrxId};
