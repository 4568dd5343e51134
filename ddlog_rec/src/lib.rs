#![cfg_attr(docsrs, feature(doc_cfg))]

//! DDL log record
//! DDL 日志记录
//!
//! `DdlRecord` is what DDL execution writes and replay consumes. `Row` is its
//! physical image in the log table, one optional field per column.
//! `DdlRecord` 由 DDL 执行写入、由回放消费。`Row` 是其在日志表中的物理镜像，每列一个可选字段。

mod builder;
mod col;
pub mod error;
mod log_type;
mod record;
mod row;

pub use builder::RecordBuilder;
pub use col::{Col, N_COLS};
pub use error::{Error, Result};
pub use log_type::LogType;
pub use record::{DdlRecord, Kind};
pub use row::Row;
