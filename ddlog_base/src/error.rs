//! Collaborator errors
//! 协作者错误

use thiserror::Error;

use crate::SpaceId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("space not found: {0}")]
  SpaceNotFound(SpaceId),

  #[error("table not found: {0}")]
  TableNotFound(Box<str>),

  #[error("table exists: {0}")]
  TableExists(Box<str>),

  #[error("{0}")]
  Other(Box<str>),
}

impl Error {
  /// 创建 Other 错误 Create Other error
  #[inline]
  pub fn other(msg: impl Into<Box<str>>) -> Self {
    Self::Other(msg.into())
  }
}
