// crates/lh_mesh/src/tags.rs

//! 边界标签位集
//!
//! 每条边界边与每个边界顶点携带一个稠密的标签位集。
//! 一个实体是边界实体当且仅当其标签集非空；顶点的标签集
//! 是其关联边界边标签集的并集。

use serde::{Deserialize, Serialize};

/// 最大可用标签编号（位集容量为 32 位）
pub const MAX_TAG: u8 = 31;

/// 边界标签位集（u32 位掩码）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TagSet(u32);

impl TagSet {
    /// 空标签集
    pub const EMPTY: Self = Self(0);

    /// 含单个标签的集合
    #[inline]
    pub const fn single(tag: u8) -> Self {
        Self(1 << tag)
    }

    /// 插入标签
    #[inline]
    pub fn insert(&mut self, tag: u8) {
        self.0 |= 1 << tag;
    }

    /// 是否包含标签
    #[inline]
    pub const fn contains(self, tag: u8) -> bool {
        self.0 & (1 << tag) != 0
    }

    /// 是否为空
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// 标签数量
    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// 并集
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// 升序迭代所有标签编号
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..=MAX_TAG).filter(move |&t| self.contains(t))
    }

    /// 原始位掩码
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TagSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for tag in self.iter() {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{}", tag)?;
            first = false;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let s = TagSet::EMPTY;
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert_eq!(s.iter().count(), 0);
    }

    #[test]
    fn test_insert_contains() {
        let mut s = TagSet::EMPTY;
        s.insert(0);
        s.insert(5);
        assert!(s.contains(0));
        assert!(s.contains(5));
        assert!(!s.contains(1));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_union() {
        let a = TagSet::single(1);
        let b = TagSet::single(3);
        let u = a.union(b);
        assert!(u.contains(1));
        assert!(u.contains(3));
        assert_eq!(u.len(), 2);
    }

    #[test]
    fn test_iter_ascending() {
        let mut s = TagSet::EMPTY;
        s.insert(7);
        s.insert(2);
        s.insert(31);
        let tags: Vec<u8> = s.iter().collect();
        assert_eq!(tags, vec![2, 7, 31]);
    }

    #[test]
    fn test_display() {
        let mut s = TagSet::EMPTY;
        s.insert(0);
        s.insert(4);
        assert_eq!(s.to_string(), "{0,4}");
    }
}
