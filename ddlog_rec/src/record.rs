//! DDL log record
//! DDL 日志记录

use std::fmt;

use ddlog_base::{IndexId, LogId, PageNo, SpaceId, TableId, ThreadId};

use crate::LogType;

/// Kind-specific payload / 各类型专有字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
  /// B-tree pages must eventually be freed / B 树页最终需释放
  FreeTree {
    space_id: SpaceId,
    page_no: PageNo,
    index_id: IndexId,
  },
  /// Tablespace file must be removed / 表空间文件需删除
  DeleteSpace { space_id: SpaceId, path: String },
  /// Tablespace file rename to replay / 需回放的表空间文件重命名
  RenameSpace {
    space_id: SpaceId,
    old_path: String,
    new_path: String,
  },
  /// Dynamic metadata entry must be removed / 动态元数据条目需删除
  Drop { table_id: TableId },
  /// Table name to (re)apply / 需（重新）应用的表名
  RenameTable {
    table_id: TableId,
    old_name: String,
    new_name: String,
  },
  /// Table must leave the dictionary cache / 表需移出字典缓存
  RemoveCache { table_id: TableId, name: String },
}

impl Kind {
  pub fn log_type(&self) -> LogType {
    match self {
      Kind::FreeTree { .. } => LogType::FreeTree,
      Kind::DeleteSpace { .. } => LogType::DeleteSpace,
      Kind::RenameSpace { .. } => LogType::RenameSpace,
      Kind::Drop { .. } => LogType::Drop,
      Kind::RenameTable { .. } => LogType::RenameTable,
      Kind::RemoveCache { .. } => LogType::RemoveCache,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdlRecord {
  pub id: LogId,
  pub thread_id: ThreadId,
  pub kind: Kind,
}

impl DdlRecord {
  #[inline]
  pub fn new(id: LogId, thread_id: ThreadId, kind: Kind) -> Self {
    Self {
      id,
      thread_id,
      kind,
    }
  }

  #[inline]
  pub fn id(&self) -> LogId {
    self.id
  }

  #[inline]
  pub fn thread_id(&self) -> ThreadId {
    self.thread_id
  }

  #[inline]
  pub fn log_type(&self) -> LogType {
    self.kind.log_type()
  }

  pub fn space_id(&self) -> Option<SpaceId> {
    match self.kind {
      Kind::FreeTree { space_id, .. }
      | Kind::DeleteSpace { space_id, .. }
      | Kind::RenameSpace { space_id, .. } => Some(space_id),
      _ => None,
    }
  }

  pub fn page_no(&self) -> Option<PageNo> {
    match self.kind {
      Kind::FreeTree { page_no, .. } => Some(page_no),
      _ => None,
    }
  }

  pub fn index_id(&self) -> Option<IndexId> {
    match self.kind {
      Kind::FreeTree { index_id, .. } => Some(index_id),
      _ => None,
    }
  }

  pub fn table_id(&self) -> Option<TableId> {
    match self.kind {
      Kind::Drop { table_id }
      | Kind::RenameTable { table_id, .. }
      | Kind::RemoveCache { table_id, .. } => Some(table_id),
      _ => None,
    }
  }

  /// Tablespace path, or old table name for `RenameTable`
  /// 表空间路径；`RenameTable` 为旧表名
  pub fn old_file_path(&self) -> Option<&str> {
    match &self.kind {
      Kind::DeleteSpace { path, .. } => Some(path),
      Kind::RenameSpace { old_path, .. } => Some(old_path),
      Kind::RenameTable { old_name, .. } => Some(old_name),
      _ => None,
    }
  }

  /// New path, new table name, or the cached table name for `RemoveCache`
  /// 新路径、新表名；`RemoveCache` 为缓存中的表名
  pub fn new_file_path(&self) -> Option<&str> {
    match &self.kind {
      Kind::RenameSpace { new_path, .. } => Some(new_path),
      Kind::RenameTable { new_name, .. } => Some(new_name),
      Kind::RemoveCache { name, .. } => Some(name),
      _ => None,
    }
  }
}

impl fmt::Display for DdlRecord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "[DDL record: {}, id={}, thread_id={}",
      self.log_type(),
      self.id,
      self.thread_id
    )?;
    if let Some(v) = self.space_id() {
      write!(f, ", space_id={v}")?;
    }
    if let Some(v) = self.table_id() {
      write!(f, ", table_id={v}")?;
    }
    if let Some(v) = self.index_id() {
      write!(f, ", index_id={v}")?;
    }
    if let Some(v) = self.page_no() {
      write!(f, ", page_no={v}")?;
    }
    if let Some(v) = self.old_file_path() {
      write!(f, ", old_file_path={v}")?;
    }
    if let Some(v) = self.new_file_path() {
      write!(f, ", new_file_path={v}")?;
    }
    f.write_str("]")
  }
}
