//! 常量定义 Constants

use crate::PageNo;

/// 无效页号 Undefined page number
pub const FIL_NULL: PageNo = u32::MAX;
