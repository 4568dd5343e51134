//! Physical row image
//! 物理行镜像
//!
//! Layout / 布局:
//! `null bitmap (u16 LE) | fixed columns raw | path columns as u32 LE length + bytes`

use crate::{Col, DdlRecord, Error, N_COLS, RecordBuilder, Result};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Row {
  fields: [Option<Box<[u8]>>; N_COLS],
}

impl Row {
  #[inline]
  pub fn get(&self, col: Col) -> Option<&[u8]> {
    self.fields[col.pos()].as_deref()
  }

  #[inline]
  pub fn set(&mut self, col: Col, data: impl Into<Box<[u8]>>) {
    self.fields[col.pos()] = Some(data.into());
  }

  /// Primary key / 主键
  pub fn id(&self) -> Option<u64> {
    self.get(Col::Id).and_then(be_u64)
  }

  /// Secondary key prefix / 二级索引前缀
  pub fn thread_id(&self) -> Option<u64> {
    self.get(Col::ThreadId).and_then(be_u64)
  }

  pub fn encode(&self, buf: &mut Vec<u8>) {
    let mut bitmap = 0u16;
    for (pos, field) in self.fields.iter().enumerate() {
      if field.is_some() {
        bitmap |= 1 << pos;
      }
    }
    buf.extend_from_slice(&bitmap.to_le_bytes());
    for col in Col::ALL {
      let Some(data) = self.get(col) else {
        continue;
      };
      if col.len().is_none() {
        buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
      }
      buf.extend_from_slice(data);
    }
  }

  pub fn decode(mut buf: &[u8]) -> Result<Self> {
    let bitmap = u16::from_le_bytes(take::<2>(&mut buf)?);
    let mut row = Row::default();
    let mut bits = bitmap;
    while bits != 0 {
      let pos = bits.trailing_zeros() as usize;
      bits &= bits - 1;
      let Some(col) = Col::from_pos(pos) else {
        return Err(Error::Bitmap(bitmap));
      };
      let len = match col.len() {
        Some(len) => len,
        None => u32::from_le_bytes(take::<4>(&mut buf)?) as usize,
      };
      if buf.len() < len {
        return Err(Error::Short);
      }
      let (data, rest) = buf.split_at(len);
      row.set(col, data);
      buf = rest;
    }
    Ok(row)
  }
}

fn take<const N: usize>(buf: &mut &[u8]) -> Result<[u8; N]> {
  let Some((head, rest)) = buf.split_first_chunk::<N>() else {
    return Err(Error::Short);
  };
  *buf = rest;
  Ok(*head)
}

fn be_u64(data: &[u8]) -> Option<u64> {
  Some(u64::from_be_bytes(data.try_into().ok()?))
}

/// Path columns keep the terminating NUL / 路径列保留结尾 NUL
fn path(s: &str) -> Box<[u8]> {
  let mut v = Vec::with_capacity(s.len() + 1);
  v.extend_from_slice(s.as_bytes());
  v.push(0);
  v.into()
}

impl From<&DdlRecord> for Row {
  fn from(rec: &DdlRecord) -> Self {
    let mut row = Row::default();
    row.set(Col::Id, rec.id.to_be_bytes());
    row.set(Col::ThreadId, rec.thread_id.to_be_bytes());
    row.set(Col::Type, rec.log_type().code().to_be_bytes());
    if let Some(v) = rec.space_id() {
      row.set(Col::SpaceId, v.to_be_bytes());
    }
    if let Some(v) = rec.page_no() {
      row.set(Col::PageNo, v.to_be_bytes());
    }
    if let Some(v) = rec.index_id() {
      row.set(Col::IndexId, v.to_be_bytes());
    }
    if let Some(v) = rec.table_id() {
      row.set(Col::TableId, v.to_be_bytes());
    }
    if let Some(v) = rec.old_file_path() {
      row.set(Col::OldFilePath, path(v));
    }
    if let Some(v) = rec.new_file_path() {
      row.set(Col::NewFilePath, path(v));
    }
    row
  }
}

impl TryFrom<&Row> for DdlRecord {
  type Error = Error;

  fn try_from(row: &Row) -> Result<Self> {
    let mut builder = RecordBuilder::default();
    for col in Col::ALL {
      if let Some(data) = row.get(col) {
        builder.set_field(col, data)?;
      }
    }
    builder.build()
  }
}

impl DdlRecord {
  #[inline]
  pub fn from_row(row: &Row) -> Result<Self> {
    Self::try_from(row)
  }
}
