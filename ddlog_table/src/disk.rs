//! Disk format of the table file
//! 表文件磁盘格式
//!
//! Frame: magic(1) + kind(1) + len(4, LE) + payload + crc32(4)
//! 帧：magic(1) + kind(1) + len(4, LE) + payload + crc32(4)

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, little_endian::U32};

/// Magic byte
/// 魔数
pub const MAGIC: u8 = 0x44;

pub const KIND_INSERT: u8 = 1;
pub const KIND_DEL_MARK: u8 = 2;
pub const KIND_COMMIT: u8 = 3;
pub const KIND_AUTOINC: u8 = 4;

/// Header size
/// 头部大小
pub const HEAD_SIZE: usize = size_of::<Head>();

/// CRC size
/// CRC 大小
pub const CRC_SIZE: usize = 4;

#[derive(FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub(crate) struct Head {
  magic: u8,
  kind: u8,
  len: U32,
}

/// Decoded frame / 解码后的帧
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Frame<'a> {
  /// Encoded row image / 编码后的行镜像
  Insert(&'a [u8]),
  DelMark(u64),
  Commit(u64),
  Autoinc(u64),
}

/// Append one frame to buffer
/// 追加一帧到缓冲区
pub(crate) fn push(buf: &mut Vec<u8>, kind: u8, payload: &[u8]) {
  let start = buf.len();
  let head = Head {
    magic: MAGIC,
    kind,
    len: U32::new(payload.len() as u32),
  };
  buf.extend_from_slice(head.as_bytes());
  buf.extend_from_slice(payload);
  // CRC covers kind + len + payload (skip magic)
  // CRC 覆盖 kind + len + payload（跳过 magic）
  let crc = crc32fast::hash(&buf[start + 1..]);
  buf.extend_from_slice(&crc.to_le_bytes());
}

#[inline]
pub(crate) fn push_u64(buf: &mut Vec<u8>, kind: u8, n: u64) {
  push(buf, kind, &n.to_le_bytes());
}

/// Parse the frame at the start of `buf`, returns frame and its size.
/// `None` means torn or damaged.
/// 解析 `buf` 开头的帧，返回帧及其大小。`None` 表示残缺或损坏。
pub(crate) fn parse(buf: &[u8]) -> Option<(Frame<'_>, usize)> {
  let (head, rest) = Head::read_from_prefix(buf).ok()?;
  if head.magic != MAGIC {
    return None;
  }
  let len = head.len.get() as usize;
  if rest.len() < len + CRC_SIZE {
    return None;
  }
  let size = HEAD_SIZE + len + CRC_SIZE;
  let crc_stored = u32::from_le_bytes(buf[size - CRC_SIZE..size].try_into().ok()?);
  if crc_stored != crc32fast::hash(&buf[1..size - CRC_SIZE]) {
    return None;
  }

  let payload = &rest[..len];
  let frame = match head.kind {
    KIND_INSERT => Frame::Insert(payload),
    KIND_DEL_MARK => Frame::DelMark(u64::from_le_bytes(payload.try_into().ok()?)),
    KIND_COMMIT => Frame::Commit(u64::from_le_bytes(payload.try_into().ok()?)),
    KIND_AUTOINC => Frame::Autoinc(u64::from_le_bytes(payload.try_into().ok()?)),
    _ => return None,
  };
  Some((frame, size))
}
