#![cfg_attr(docsrs, feature(doc_cfg))]

//! Reference storage collaborators
//! 参考存储协作者
//!
//! A tablespace file map over real files, B-tree roots, table names, a
//! dictionary cache with adaptive hash entries, the dynamic metadata buffer
//! and persisted statistics. Enough engine for DDL log replay to act on.
//! 基于真实文件的表空间映射、B 树根、表名、带自适应哈希条目的字典缓存、动态元数据缓冲与持久化统计。

mod cache;
mod dict;
mod meta;
mod space;

use std::path::{Path, PathBuf};

pub use cache::Cached;
use ddlog_base::{Engine, IndexId, PageNo, Result, SpaceId, TableId};
use parking_lot::Mutex;

#[derive(Default)]
pub struct Store {
  dir: PathBuf,
  dict_mutex: Mutex<()>,
  key_rotation_mutex: Mutex<()>,
  spaces: space::Spaces,
  names: dict::Names,
  cache: cache::Cache,
  meta: meta::Meta,
}

impl Store {
  /// Tablespace files live under `dir` / 表空间文件位于 `dir` 下
  pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
    let dir = dir.into();
    std::fs::create_dir_all(&dir)?;
    Ok(Self {
      dir,
      ..Self::default()
    })
  }

  #[inline]
  pub fn dir(&self) -> &Path {
    &self.dir
  }
}

impl Engine for Store {
  #[inline]
  fn dict_mutex(&self) -> &Mutex<()> {
    &self.dict_mutex
  }

  #[inline]
  fn key_rotation_mutex(&self) -> &Mutex<()> {
    &self.key_rotation_mutex
  }

  fn space_exists(&self, space_id: SpaceId) -> bool {
    self.space_path(space_id).is_some()
  }

  fn free_tree(&self, space_id: SpaceId, page_no: PageNo, index_id: IndexId) -> Result<bool> {
    Ok(self.drop_tree(space_id, page_no, index_id))
  }

  fn delete_space(&self, space_id: SpaceId, path: &str) -> Result<bool> {
    self.drop_space(space_id, path)
  }

  fn rename_space(&self, space_id: SpaceId, old_path: &str, new_path: &str) -> Result<bool> {
    self.move_space(space_id, old_path, new_path)
  }

  fn drop_metadata(&self, table_id: TableId) -> Result<bool> {
    Ok(self.remove_metadata(table_id))
  }

  fn rename_table(&self, old_name: &str, new_name: &str) -> Result<()> {
    self.rename_name(old_name, new_name)?;
    self.cache.rename(old_name, new_name);
    Ok(())
  }

  fn release_cached(&self, name: &str) -> bool {
    self.cache.release(name)
  }

  fn rename_stats(&self, old_name: &str, new_name: &str) -> Result<()> {
    self.move_stats(old_name, new_name);
    Ok(())
  }

  fn evict(&self, table_id: TableId, name: &str) -> bool {
    self.cache.evict(table_id, name)
  }
}
