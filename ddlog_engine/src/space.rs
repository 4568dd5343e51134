//! Tablespace file map and B-tree roots
//! 表空间文件映射与 B 树根

use std::{collections::HashMap, fs, io, path::Path};

use ddlog_base::{Error, IndexId, PageNo, Result, SpaceId};
use log::{info, warn};
use parking_lot::{Mutex, RwLock};

use crate::Store;

#[derive(Default)]
pub(crate) struct Spaces {
  files: RwLock<HashMap<SpaceId, String>>,
  trees: Mutex<HashMap<(SpaceId, PageNo), IndexId>>,
}

/// Remove file, `false` if it was already gone
/// 删除文件，已不存在时返回 `false`
fn rm(path: &Path) -> io::Result<bool> {
  match fs::remove_file(path) {
    Ok(()) => Ok(true),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
    Err(e) => Err(e),
  }
}

impl Store {
  /// Create the tablespace file and register it / 创建表空间文件并登记
  pub fn create_space(&self, space_id: SpaceId, path: &str) -> Result<()> {
    let file = self.dir().join(path);
    if let Some(parent) = file.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::File::create(&file)?;
    self.spaces.files.write().insert(space_id, path.to_owned());
    Ok(())
  }

  pub fn space_path(&self, space_id: SpaceId) -> Option<String> {
    self.spaces.files.read().get(&space_id).cloned()
  }

  /// Tablespace file present on disk / 表空间文件在磁盘上存在
  pub fn space_file_exists(&self, path: &str) -> bool {
    self.dir().join(path).exists()
  }

  pub(crate) fn drop_space(&self, space_id: SpaceId, path: &str) -> Result<bool> {
    let known = self.spaces.files.write().remove(&space_id);
    self.spaces.trees.lock().retain(|(s, _), _| *s != space_id);
    let file = known.as_deref().unwrap_or(path);
    let removed = rm(&self.dir().join(file))?;
    if known.is_none() && !removed {
      info!("space {space_id} {path} already gone");
    }
    Ok(known.is_some() || removed)
  }

  /// Already at `new_path` is a no-op (`false`) / 已位于 `new_path` 时不处理（返回 `false`）
  pub(crate) fn move_space(&self, space_id: SpaceId, old_path: &str, new_path: &str) -> Result<bool> {
    let mut files = self.spaces.files.write();
    let Some(cur) = files.get_mut(&space_id) else {
      return Err(Error::SpaceNotFound(space_id));
    };
    if *cur == new_path {
      return Ok(false);
    }
    if *cur != old_path {
      return Err(Error::other(format!(
        "space {space_id} is at {cur}, expect {old_path}"
      )));
    }

    let from = self.dir().join(old_path);
    let to = self.dir().join(new_path);
    if from.exists() {
      if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
      }
      fs::rename(&from, &to)?;
    } else if !to.exists() {
      warn!("space {space_id} : neither {old_path} nor {new_path} on disk");
    }
    *cur = new_path.to_owned();
    Ok(true)
  }

  /// Register a B-tree root / 登记 B 树根
  pub fn create_tree(&self, space_id: SpaceId, page_no: PageNo, index_id: IndexId) {
    self.spaces.trees.lock().insert((space_id, page_no), index_id);
  }

  pub fn tree_exists(&self, space_id: SpaceId, page_no: PageNo) -> bool {
    self.spaces.trees.lock().contains_key(&(space_id, page_no))
  }

  /// Root reused by another index is left alone / 根页已被其他索引复用时不处理
  pub(crate) fn drop_tree(&self, space_id: SpaceId, page_no: PageNo, index_id: IndexId) -> bool {
    let mut trees = self.spaces.trees.lock();
    if trees.get(&(space_id, page_no)) == Some(&index_id) {
      trees.remove(&(space_id, page_no));
      return true;
    }
    false
  }
}
