//! Ordered index with bounded leaves
//! 叶子容量有界的有序索引
//!
//! Entries live in one `BTreeMap`; leaves are tracked as separator keys with an
//! entry count. An insert first tries the leaf as is (`Mode::Leaf`), and only
//! on `Fail::Full` retries with `Mode::Tree`, which splits the leaf at its
//! median. Empty leaves merge into their neighbour.
//! 条目存于一个 `BTreeMap`；叶子以分隔键加计数表示。插入先按叶子原样尝试（`Mode::Leaf`），
//! 仅在 `Fail::Full` 时以 `Mode::Tree` 重试，在中位数处分裂叶子。空叶子并入相邻叶子。

use std::{
  collections::BTreeMap,
  ops::{Bound, RangeBounds},
};

/// Insert mode / 插入模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
  /// Leaf-local, fails when the leaf is full / 仅限叶子内，叶子满则失败
  Leaf,
  /// May split the leaf / 允许分裂叶子
  Tree,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fail {
  Dup,
  Full,
}

#[derive(Debug)]
pub(crate) struct Index<K, V> {
  map: BTreeMap<K, V>,
  leaves: BTreeMap<K, usize>,
  cap: usize,
  splits: u64,
}

impl<K: Ord + Clone, V> Index<K, V> {
  pub fn new(cap: usize) -> Self {
    Self {
      map: BTreeMap::new(),
      leaves: BTreeMap::new(),
      cap,
      splits: 0,
    }
  }

  /// Separator of the leaf that owns `key`
  /// 拥有 `key` 的叶子分隔键
  fn leaf_of(&self, key: &K) -> Option<K> {
    self
      .leaves
      .range(..=key)
      .next_back()
      .or_else(|| self.leaves.iter().next())
      .map(|(k, _)| k.clone())
  }

  /// Key range covered by the leaf `sep`
  /// 叶子 `sep` 覆盖的键范围
  fn leaf_range(&self, sep: &K) -> (Bound<K>, Bound<K>) {
    let first = self.leaves.keys().next() == Some(sep);
    let lo = if first {
      Bound::Unbounded
    } else {
      Bound::Included(sep.clone())
    };
    let hi = match self
      .leaves
      .range((Bound::Excluded(sep), Bound::Unbounded))
      .next()
    {
      Some((next, _)) => Bound::Excluded(next.clone()),
      None => Bound::Unbounded,
    };
    (lo, hi)
  }

  fn split(&mut self, sep: &K) {
    let keys: Vec<K> = self.map.range(self.leaf_range(sep)).map(|(k, _)| k.clone()).collect();
    let half = keys.len() / 2;
    if half == 0 {
      return;
    }
    let mid = keys[half].clone();
    self.leaves.insert(sep.clone(), half);
    self.leaves.insert(mid, keys.len() - half);
    self.splits += 1;
  }

  /// Make room for `key` in its leaf
  /// 在所属叶子中为 `key` 预留位置
  pub fn reserve(&mut self, key: &K, mode: Mode) -> Result<(), Fail> {
    if self.map.contains_key(key) {
      return Err(Fail::Dup);
    }
    let Some(mut sep) = self.leaf_of(key) else {
      self.leaves.insert(key.clone(), 1);
      return Ok(());
    };
    if self.leaves.get(&sep).copied().unwrap_or(0) >= self.cap {
      if mode == Mode::Leaf {
        return Err(Fail::Full);
      }
      self.split(&sep);
      if let Some(s) = self.leaf_of(key) {
        sep = s;
      }
    }
    if let Some(n) = self.leaves.get_mut(&sep) {
      *n += 1;
    }
    Ok(())
  }

  /// Optimistic insert, then pessimistic on a full leaf
  /// 先乐观插入，叶子满时再悲观插入
  pub fn insert_with_retry(&mut self, key: K, val: V) -> Result<(), Fail> {
    match self.reserve(&key, Mode::Leaf) {
      Err(Fail::Full) => self.reserve(&key, Mode::Tree)?,
      r => r?,
    }
    self.map.insert(key, val);
    Ok(())
  }

  pub fn remove(&mut self, key: &K) -> Option<V> {
    let val = self.map.remove(key)?;
    if let Some(sep) = self.leaf_of(key)
      && let Some(n) = self.leaves.get_mut(&sep)
    {
      *n = n.saturating_sub(1);
      if *n == 0 && self.leaves.len() > 1 {
        self.leaves.remove(&sep);
      }
    }
    if self.map.is_empty() {
      self.leaves.clear();
    }
    Some(val)
  }

  #[inline]
  pub fn get(&self, key: &K) -> Option<&V> {
    self.map.get(key)
  }

  #[inline]
  pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
    self.map.get_mut(key)
  }

  #[inline]
  pub fn range<R: RangeBounds<K>>(&self, range: R) -> impl DoubleEndedIterator<Item = (&K, &V)> {
    self.map.range(range)
  }

  #[inline]
  pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> {
    self.map.iter()
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.map.len()
  }

  #[inline]
  #[cfg(test)]
  pub fn is_empty(&self) -> bool {
    self.map.is_empty()
  }

  #[inline]
  pub fn leaves(&self) -> usize {
    self.leaves.len()
  }

  #[inline]
  pub fn splits(&self) -> u64 {
    self.splits
  }

  /// Entry count per leaf, in key order / 按键序的每叶条目数
  #[cfg(test)]
  pub fn leaf_counts(&self) -> Vec<usize> {
    self.leaves.values().copied().collect()
  }
}
