/// Log table configuration
/// 日志表配置
#[derive(Clone, Copy, Debug)]
pub enum Conf {
  /// Compact once this many rows are delete-marked
  /// 删除标记行达到此数量后压缩
  CompactAfter(usize),
  /// Entries per index leaf before it must split (at least 2)
  /// 索引叶子分裂前的条目数（至少 2）
  LeafCap(usize),
}
