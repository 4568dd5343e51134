//! Load table file into indexes
//! 加载表文件到索引

use std::{fs, io, path::Path};

use ddlog_base::LogId;
use ddlog_rec::{DdlRecord, Row};
use log::warn;

use crate::{
  Error, Result,
  disk::{self, Frame},
  index::Index,
  state::{Clust, ClustIndex, SecIndex},
};

pub(crate) struct Loaded {
  pub clust: ClustIndex,
  pub sec: SecIndex,
  pub autoinc: u64,
  /// Last committed transaction / 最后提交的事务
  pub trx_id: u64,
  pub frames: usize,
  pub end: u64,
  /// Torn tail, uncommitted frames or dead rows / 残缺尾部、未提交帧或已删除行
  pub garbage: bool,
}

fn apply(clust: &mut ClustIndex, sec: &mut SecIndex, frame: Frame<'_>) -> Result<()> {
  match frame {
    Frame::Insert(payload) => {
      let row = Row::decode(payload)?;
      let rec = DdlRecord::from_row(&row)?;
      clust
        .insert_with_retry(rec.id, Clust::committed(row))
        .map_err(|_| Error::Duplicate(rec.id))?;
      sec
        .insert_with_retry((rec.thread_id, rec.id), false)
        .map_err(|_| Error::Duplicate(rec.id))?;
    }
    // Committed delete mark, purge at once 已提交的删除标记，直接清除
    Frame::DelMark(id) => {
      if let Some(c) = clust.remove(&id)
        && let Some(thread_id) = c.row.thread_id()
      {
        sec.remove(&(thread_id, id));
      }
    }
    Frame::Commit(_) | Frame::Autoinc(_) => {}
  }
  Ok(())
}

pub(crate) fn load(path: &Path, leaf_cap: usize) -> Result<Loaded> {
  let buf = match fs::read(path) {
    Ok(buf) => buf,
    Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
    Err(e) => return Err(e.into()),
  };

  let mut clust = Index::new(leaf_cap);
  let mut sec = Index::new(leaf_cap);
  let mut autoinc = 0u64;
  let mut trx_id = 0u64;
  let mut frames = 0usize;
  let mut pos = 0usize;
  let mut deletes = 0usize;
  let mut pending = Vec::new();
  let mut torn = false;

  while pos < buf.len() {
    let Some((frame, n)) = disk::parse(&buf[pos..]) else {
      warn!("ddl log table : torn tail at {pos}, drop {} bytes", buf.len() - pos);
      torn = true;
      break;
    };
    frames += 1;
    pos += n;
    match frame {
      Frame::Autoinc(n) => autoinc = autoinc.max(n),
      Frame::Commit(id) => {
        trx_id = trx_id.max(id);
        for frame in pending.drain(..) {
          if matches!(frame, Frame::DelMark(_)) {
            deletes += 1;
          }
          apply(&mut clust, &mut sec, frame)?;
        }
      }
      frame => pending.push(frame),
    }
  }

  if !pending.is_empty() {
    warn!("ddl log table : {} uncommitted frames dropped", pending.len());
  }

  let max_id: LogId = clust.iter().next_back().map(|(id, _)| *id).unwrap_or(0);
  let garbage = torn || !pending.is_empty() || deletes > 0 || (frames > 0 && frames != clust.len() + 2);

  Ok(Loaded {
    autoinc: autoinc.max(max_id),
    trx_id,
    clust,
    sec,
    frames,
    end: pos as u64,
    garbage,
  })
}
