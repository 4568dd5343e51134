//! Table and index handles passed in by DDL execution
//! DDL 执行传入的表与索引句柄

use crate::{FIL_NULL, IndexId, PageNo, SpaceId, TableId};

/// Table handle / 表句柄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
  pub id: TableId,
  pub name: String,
  pub space_id: SpaceId,
  /// Temporary tables are never logged / 临时表不记日志
  pub temporary: bool,
  pub file_per_table: bool,
}

impl Table {
  pub fn new(id: TableId, name: impl Into<String>, space_id: SpaceId) -> Self {
    Self {
      id,
      name: name.into(),
      space_id,
      temporary: false,
      file_per_table: true,
    }
  }

  pub fn temporary(mut self) -> Self {
    self.temporary = true;
    self
  }
}

/// Index handle / 索引句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index {
  pub id: IndexId,
  pub space_id: SpaceId,
  /// Root page / 根页
  pub page_no: PageNo,
  /// Fulltext indexes own no B-tree / 全文索引没有 B 树
  pub fulltext: bool,
}

impl Index {
  pub fn new(id: IndexId, space_id: SpaceId, page_no: PageNo) -> Self {
    Self {
      id,
      space_id,
      page_no,
      fulltext: false,
    }
  }

  pub fn fulltext(id: IndexId, space_id: SpaceId) -> Self {
    Self {
      id,
      space_id,
      page_no: FIL_NULL,
      fulltext: true,
    }
  }
}
