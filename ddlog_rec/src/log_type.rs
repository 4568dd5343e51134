//! Record type discriminant, stored in the `type` column
//! 记录类型标识，存于 `type` 列

use std::fmt;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum LogType {
  FreeTree = 1,
  DeleteSpace = 2,
  RenameSpace = 3,
  Drop = 4,
  RenameTable = 5,
  RemoveCache = 6,
}

impl LogType {
  #[inline]
  pub const fn code(self) -> u32 {
    self as u32
  }
}

impl TryFrom<u32> for LogType {
  type Error = Error;

  fn try_from(code: u32) -> Result<Self, Error> {
    Ok(match code {
      1 => Self::FreeTree,
      2 => Self::DeleteSpace,
      3 => Self::RenameSpace,
      4 => Self::Drop,
      5 => Self::RenameTable,
      6 => Self::RemoveCache,
      _ => return Err(Error::Type(code)),
    })
  }
}

impl fmt::Display for LogType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::FreeTree => "FREE",
      Self::DeleteSpace => "DELETE",
      Self::RenameSpace => "RENAME",
      Self::Drop => "DROP",
      Self::RenameTable => "RENAME TABLE",
      Self::RemoveCache => "REMOVE",
    })
  }
}
