//! Rewrite table file
//! 重写表文件

use std::{
  fs::{self, File},
  io::Write,
  path::Path,
};

use crate::{
  disk::{self, KIND_AUTOINC, KIND_COMMIT, KIND_INSERT},
  error::Result,
  state::ClustIndex,
};

/// Write counter and live rows to a tmp file, then rename over `path` and sync
/// the directory. Returns the reopened file, its length and frame count.
/// 将计数器与有效行写入临时文件后重命名覆盖 `path` 并同步目录。返回重新打开的文件、长度与帧数。
pub(crate) fn rewrite(
  path: &Path,
  autoinc: u64,
  trx_id: u64,
  clust: &ClustIndex,
) -> Result<(File, u64, usize)> {
  let mut buf = Vec::new();
  let mut row_buf = Vec::new();
  let mut frames = 2;

  disk::push_u64(&mut buf, KIND_AUTOINC, autoinc);
  for (_, c) in clust.iter().filter(|(_, c)| !c.deleted) {
    row_buf.clear();
    c.row.encode(&mut row_buf);
    disk::push(&mut buf, KIND_INSERT, &row_buf);
    frames += 1;
  }
  disk::push_u64(&mut buf, KIND_COMMIT, trx_id);

  let tmp = path.with_extension("tmp");
  // Tmp file never outlives the call 临时文件不留存
  defer_lite::defer! { let _ = fs::remove_file(&tmp); }

  {
    let mut file = File::create(&tmp)?;
    file.write_all(&buf)?;
    file.sync_all()?;
  }
  fs::rename(&tmp, path)?;
  if let Some(dir) = path.parent() {
    File::open(dir)?.sync_all()?;
  }

  let file = fs::OpenOptions::new().read(true).write(true).open(path)?;
  Ok((file, buf.len() as u64, frames))
}
