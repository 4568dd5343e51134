/// Service configuration
/// 服务配置
#[derive(Clone, Copy, Debug)]
pub enum Conf {
  /// Server started read-only, no replay / 只读启动，不回放
  ReadOnly,
  /// Forced recovery level, 0 is off / 强制恢复级别，0 为关闭
  ForceRecovery(u8),
  /// Passed to the log table / 传给日志表
  Table(ddlog_table::Conf),
}
