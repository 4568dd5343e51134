//! 解码错误 Decode errors

use thiserror::Error;

use crate::Col;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  #[error("unknown log type: {0}")]
  Type(u32),

  #[error("column {0} missing")]
  Missing(Col),

  #[error("column {col} length {len}, expect {expect}")]
  Len { col: Col, len: usize, expect: usize },

  #[error("column {0} is not utf8")]
  Utf8(Col),

  #[error("null bitmap {0:#06x} names unknown columns")]
  Bitmap(u16),

  #[error("row image truncated")]
  Short,
}
