//! Field-by-field record decoding
//! 逐字段解码记录
//!
//! Mirrors the flat column layout: every column is optional until `build`
//! checks that the type has what it needs.
//! 与扁平列布局一一对应：`build` 之前各列均可缺省，`build` 时按类型校验必需列。

use ddlog_base::{IndexId, LogId, PageNo, SpaceId, TableId, ThreadId};

use crate::{Col, DdlRecord, Error, Kind, LogType, Result};

#[derive(Debug, Default, Clone)]
pub struct RecordBuilder {
  pub id: Option<LogId>,
  pub thread_id: Option<ThreadId>,
  pub ty: Option<u32>,
  pub space_id: Option<SpaceId>,
  pub page_no: Option<PageNo>,
  pub index_id: Option<IndexId>,
  pub table_id: Option<TableId>,
  pub old_file_path: Option<String>,
  pub new_file_path: Option<String>,
}

/// Read an integer column (big-endian) / 读取整数列（大端）
///
/// Path columns never reach here.
/// 路径列不会走到这里。
fn fetch_value(data: &[u8], col: Col) -> u64 {
  match col {
    Col::Id | Col::ThreadId | Col::IndexId | Col::TableId => {
      let mut buf = [0u8; 8];
      buf.copy_from_slice(&data[..8]);
      u64::from_be_bytes(buf)
    }
    Col::Type | Col::SpaceId | Col::PageNo => {
      let mut buf = [0u8; 4];
      buf.copy_from_slice(&data[..4]);
      u32::from_be_bytes(buf) as u64
    }
    Col::OldFilePath | Col::NewFilePath => unreachable!("{col} is not an integer column"),
  }
}

/// Path bytes up to the terminating NUL / 截至结尾 NUL 的路径字节
fn fetch_path(data: &[u8], col: Col) -> Result<String> {
  let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
  std::str::from_utf8(&data[..end])
    .map(str::to_owned)
    .map_err(|_| Error::Utf8(col))
}

impl RecordBuilder {
  /// Decode one stored field into its typed slot / 将一个存储字段解码到对应槽位
  pub fn set_field(&mut self, col: Col, data: &[u8]) -> Result<()> {
    match col {
      Col::OldFilePath => {
        self.old_file_path = Some(fetch_path(data, col)?);
        return Ok(());
      }
      Col::NewFilePath => {
        self.new_file_path = Some(fetch_path(data, col)?);
        return Ok(());
      }
      _ => {}
    }

    if let Some(expect) = col.len()
      && data.len() != expect
    {
      return Err(Error::Len {
        col,
        len: data.len(),
        expect,
      });
    }

    let value = fetch_value(data, col);
    match col {
      Col::Id => self.id = Some(value),
      Col::ThreadId => self.thread_id = Some(value),
      Col::Type => self.ty = Some(value as u32),
      Col::SpaceId => self.space_id = Some(value as SpaceId),
      Col::PageNo => self.page_no = Some(value as PageNo),
      Col::IndexId => self.index_id = Some(value),
      Col::TableId => self.table_id = Some(value),
      Col::OldFilePath | Col::NewFilePath => unreachable!(),
    }
    Ok(())
  }

  pub fn build(self) -> Result<DdlRecord> {
    let id = self.id.ok_or(Error::Missing(Col::Id))?;
    let thread_id = self.thread_id.ok_or(Error::Missing(Col::ThreadId))?;
    let ty = LogType::try_from(self.ty.ok_or(Error::Missing(Col::Type))?)?;

    let space_id = || self.space_id.ok_or(Error::Missing(Col::SpaceId));
    let table_id = || self.table_id.ok_or(Error::Missing(Col::TableId));
    let old = self.old_file_path.clone().ok_or(Error::Missing(Col::OldFilePath));
    let new = self.new_file_path.clone().ok_or(Error::Missing(Col::NewFilePath));

    let kind = match ty {
      LogType::FreeTree => Kind::FreeTree {
        space_id: space_id()?,
        page_no: self.page_no.ok_or(Error::Missing(Col::PageNo))?,
        index_id: self.index_id.ok_or(Error::Missing(Col::IndexId))?,
      },
      LogType::DeleteSpace => Kind::DeleteSpace {
        space_id: space_id()?,
        path: old?,
      },
      LogType::RenameSpace => Kind::RenameSpace {
        space_id: space_id()?,
        old_path: old?,
        new_path: new?,
      },
      LogType::Drop => Kind::Drop {
        table_id: table_id()?,
      },
      LogType::RenameTable => Kind::RenameTable {
        table_id: table_id()?,
        old_name: old?,
        new_name: new?,
      },
      LogType::RemoveCache => Kind::RemoveCache {
        table_id: table_id()?,
        name: new?,
      },
    };

    Ok(DdlRecord::new(id, thread_id, kind))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  #[should_panic]
  fn test_fetch_value_path_column() {
    fetch_value(b"db/t1.ibd\0", Col::OldFilePath);
  }

  #[test]
  fn test_fetch_value_widths() {
    assert_eq!(fetch_value(&7u64.to_be_bytes(), Col::TableId), 7);
    assert_eq!(fetch_value(&9u32.to_be_bytes(), Col::PageNo), 9);
  }

  #[test]
  fn test_path_stops_at_nul() {
    assert_eq!(fetch_path(b"db/t1\0junk", Col::NewFilePath).unwrap(), "db/t1");
    assert_eq!(fetch_path(b"db/t2", Col::NewFilePath).unwrap(), "db/t2");
  }
}
