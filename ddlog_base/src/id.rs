//! Id types
//! ID 类型

/// DDL log record id (autoincrement) / DDL 日志记录 ID（自增）
pub type LogId = u64;

/// Worker / connection id / 工作线程（连接）ID
pub type ThreadId = u64;

/// Transaction id / 事务 ID
pub type TrxId = u64;

/// Tablespace id / 表空间 ID
pub type SpaceId = u32;

/// Page number inside a tablespace / 表空间内页号
pub type PageNo = u32;

/// Index id / 索引 ID
pub type IndexId = u64;

/// Table id / 表 ID
pub type TableId = u64;
