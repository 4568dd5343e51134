//! Storage engine primitives used by replay
//! 回放所用的存储引擎原语
//!
//! Every method is idempotent: asking to remove something that is already
//! gone reports `false` instead of failing.
//! 所有方法幂等：删除已不存在的对象返回 `false` 而非报错。

use parking_lot::Mutex;

use crate::{IndexId, PageNo, Result, SpaceId, TableId};

pub trait Engine: Send + Sync {
  /// Dictionary mutex / 数据字典互斥锁
  fn dict_mutex(&self) -> &Mutex<()>;

  /// Blocks master key rotation while a tablespace is deleted
  /// 删除表空间期间阻止主密钥轮换
  fn key_rotation_mutex(&self) -> &Mutex<()>;

  /// Tablespace present in the file map / 文件映射中是否存在表空间
  fn space_exists(&self, space_id: SpaceId) -> bool;

  /// Free the B-tree rooted at `page_no` if the root still belongs to `index_id`
  /// 若根页仍属于 `index_id`，释放该 B 树
  fn free_tree(&self, space_id: SpaceId, page_no: PageNo, index_id: IndexId) -> Result<bool>;

  /// Drop tablespace and delete its file / 删除表空间及其文件
  fn delete_space(&self, space_id: SpaceId, path: &str) -> Result<bool>;

  /// Replay a tablespace file rename / 回放表空间文件重命名
  fn rename_space(&self, space_id: SpaceId, old_path: &str, new_path: &str) -> Result<bool>;

  /// Remove a table from the dynamic metadata buffer / 从动态元数据缓冲移除表
  fn drop_metadata(&self, table_id: TableId) -> Result<bool>;

  /// Rename a table in the dictionary / 在数据字典中重命名表
  fn rename_table(&self, old_name: &str, new_name: &str) -> Result<()>;

  /// Release the DDL hold on a cached handle, if open in memory
  /// 若表已在内存中打开，释放其 DDL 占用
  fn release_cached(&self, name: &str) -> bool;

  /// Move persisted statistics to the new name / 将持久化统计迁移到新表名
  fn rename_stats(&self, old_name: &str, new_name: &str) -> Result<()>;

  /// Close references, drop adaptive hash entries, evict from cache
  /// 关闭引用、删除自适应哈希条目并从缓存驱逐
  fn evict(&self, table_id: TableId, name: &str) -> bool;
}
