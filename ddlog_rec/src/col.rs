//! 日志表列布局 Log table column layout

use std::fmt;

/// 列数 Column count
pub const N_COLS: usize = 9;

/// Columns in table order / 按表定义顺序的列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Col {
  Id = 0,
  ThreadId = 1,
  Type = 2,
  SpaceId = 3,
  PageNo = 4,
  IndexId = 5,
  TableId = 6,
  OldFilePath = 7,
  NewFilePath = 8,
}

impl Col {
  pub const ALL: [Col; N_COLS] = [
    Col::Id,
    Col::ThreadId,
    Col::Type,
    Col::SpaceId,
    Col::PageNo,
    Col::IndexId,
    Col::TableId,
    Col::OldFilePath,
    Col::NewFilePath,
  ];

  #[inline]
  pub fn from_pos(pos: usize) -> Option<Self> {
    Self::ALL.get(pos).copied()
  }

  #[inline]
  pub const fn pos(self) -> usize {
    self as usize
  }

  /// Fixed width in bytes, `None` for path columns / 定长字节数，路径列为 `None`
  #[inline]
  pub const fn len(self) -> Option<usize> {
    match self {
      Col::Id | Col::ThreadId | Col::IndexId | Col::TableId => Some(8),
      Col::Type | Col::SpaceId | Col::PageNo => Some(4),
      Col::OldFilePath | Col::NewFilePath => None,
    }
  }

  pub const fn name(self) -> &'static str {
    match self {
      Col::Id => "id",
      Col::ThreadId => "thread_id",
      Col::Type => "type",
      Col::SpaceId => "space_id",
      Col::PageNo => "page_no",
      Col::IndexId => "index_id",
      Col::TableId => "table_id",
      Col::OldFilePath => "old_file_path",
      Col::NewFilePath => "new_file_path",
    }
  }
}

impl fmt::Display for Col {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
