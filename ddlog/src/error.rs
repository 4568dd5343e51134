//! Error types for DDL log operations
//! DDL 日志操作的错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("log table: {0}")]
  Table(#[from] ddlog_table::Error),

  #[error("engine: {0}")]
  Engine(#[from] ddlog_base::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
