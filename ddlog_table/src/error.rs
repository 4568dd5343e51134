//! Error types for log table operations
//! 日志表操作的错误类型

use ddlog_base::LogId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("IO: {0}")]
  Io(#[from] std::io::Error),

  #[error("record: {0}")]
  Rec(#[from] ddlog_rec::Error),

  #[error("file locked / 文件已锁定")]
  Locked,

  #[error("duplicate id {0}")]
  Duplicate(LogId),

  #[error("index corrupt at id {0}")]
  Corrupt(LogId),
}

pub type Result<T> = std::result::Result<T, Error>;
