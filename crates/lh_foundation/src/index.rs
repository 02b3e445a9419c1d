// crates/lh_foundation/src/index.rs

//! 强类型实体索引系统
//!
//! 使用泛型 `Idx<T>` 实现类型安全的轻量级实体索引。
//!
//! # 设计目标
//!
//! 1. **类型安全**: 编译期区分不同实体的索引（Cell/Edge/Vertex/Corner/Wedge）
//! 2. **零开销**: 与 u32 完全相同的内存布局和性能
//! 3. **简洁API**: 提供类型别名和便捷构造函数
//!
//! # 示例
//!
//! ```
//! use lh_foundation::index::{CellIndex, VertexIndex};
//!
//! let c = CellIndex::new(0);
//! assert!(c.is_valid());
//! assert_eq!(c.as_usize(), 0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// 无效索引标记
pub const INVALID_INDEX: u32 = u32::MAX;

// ============================================================================
// 标记类型 (Phantom Types)
// ============================================================================

/// 单元索引标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellTag;

/// 边索引标记（二维下边与面重合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeTag;

/// 顶点索引标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexTag;

/// 角索引标记（单元-顶点关联）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CornerTag;

/// 楔索引标记（单元-边-顶点关联）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WedgeTag;

// ============================================================================
// 泛型索引类型
// ============================================================================

/// 轻量级泛型索引（4 字节）
///
/// 使用 Phantom Type `T` 区分不同实体的索引，避免误用。
/// `#[repr(transparent)]` 保证与 u32 完全相同的内存布局。
#[derive(Serialize, Deserialize)]
#[repr(transparent)]
pub struct Idx<T> {
    index: u32,
    #[serde(skip)]
    _marker: PhantomData<fn() -> T>,
}

// 手动实现 Copy 和 Clone，因为 PhantomData<T> 的 Copy 需要 T: Copy
impl<T> Copy for Idx<T> {}

impl<T> Clone for Idx<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Idx<T> {
    /// 无效索引常量
    pub const INVALID: Self = Self {
        index: INVALID_INDEX,
        _marker: PhantomData,
    };

    /// 创建新索引
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// 从 usize 创建
    #[inline]
    pub fn from_usize(index: usize) -> Self {
        Self::new(index as u32)
    }

    /// 获取索引值
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// 获取索引值（usize）
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.index as usize
    }

    /// 判断索引是否有效
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.index != INVALID_INDEX
    }

    /// 判断索引是否无效
    #[inline]
    pub const fn is_invalid(self) -> bool {
        self.index == INVALID_INDEX
    }

    /// 转换为 `Option<usize>`（无效则返回 None）
    #[inline]
    pub fn to_option(self) -> Option<usize> {
        if self.is_valid() {
            Some(self.as_usize())
        } else {
            None
        }
    }
}

// ============================================================================
// Trait 实现
// ============================================================================

impl<T> Default for Idx<T> {
    fn default() -> Self {
        Self::INVALID
    }
}

impl<T> PartialEq for Idx<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Idx<T> {}

impl<T> PartialOrd for Idx<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Idx<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> Hash for Idx<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Idx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Idx({})", self.index)
        } else {
            write!(f, "Idx(INVALID)")
        }
    }
}

impl<T> fmt::Display for Idx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.index)
        } else {
            write!(f, "INVALID")
        }
    }
}

impl<T> From<usize> for Idx<T> {
    #[inline]
    fn from(index: usize) -> Self {
        Self::from_usize(index)
    }
}

impl<T> From<Idx<T>> for usize {
    #[inline]
    fn from(idx: Idx<T>) -> usize {
        idx.as_usize()
    }
}

impl<T> From<u32> for Idx<T> {
    #[inline]
    fn from(index: u32) -> Self {
        Self::new(index)
    }
}

impl<T> From<Idx<T>> for u32 {
    #[inline]
    fn from(idx: Idx<T>) -> u32 {
        idx.index()
    }
}

// ============================================================================
// 类型别名
// ============================================================================

/// 单元索引
pub type CellIndex = Idx<CellTag>;

/// 边索引
pub type EdgeIndex = Idx<EdgeTag>;

/// 顶点索引
pub type VertexIndex = Idx<VertexTag>;

/// 角索引
pub type CornerIndex = Idx<CornerTag>;

/// 楔索引
pub type WedgeIndex = Idx<WedgeTag>;

// ============================================================================
// 便捷函数
// ============================================================================

/// 创建单元索引
#[inline]
pub const fn cell(index: u32) -> CellIndex {
    CellIndex::new(index)
}

/// 创建边索引
#[inline]
pub const fn edge(index: u32) -> EdgeIndex {
    EdgeIndex::new(index)
}

/// 创建顶点索引
#[inline]
pub const fn vertex(index: u32) -> VertexIndex {
    VertexIndex::new(index)
}

/// 创建角索引
#[inline]
pub const fn corner(index: u32) -> CornerIndex {
    CornerIndex::new(index)
}

/// 创建楔索引
#[inline]
pub const fn wedge(index: u32) -> WedgeIndex {
    WedgeIndex::new(index)
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idx_creation() {
        let idx = CellIndex::new(10);
        assert_eq!(idx.index(), 10);
        assert!(idx.is_valid());
    }

    #[test]
    fn test_idx_invalid() {
        let idx = VertexIndex::INVALID;
        assert!(!idx.is_valid());
        assert!(idx.is_invalid());
        assert_eq!(idx.to_option(), None);
    }

    #[test]
    fn test_idx_conversions() {
        let idx: CornerIndex = 42usize.into();
        assert_eq!(idx.index(), 42);
        let val: usize = idx.into();
        assert_eq!(val, 42);
    }

    #[test]
    fn test_type_safety() {
        let cell_idx = CellIndex::new(0);
        let edge_idx = EdgeIndex::new(0);

        // 编译时类型检查：下面的代码如果取消注释会编译失败
        // let _: CellIndex = edge_idx;

        // 但可以比较索引值
        assert_eq!(cell_idx.index(), edge_idx.index());
    }

    #[test]
    fn test_idx_size() {
        // 确保 Idx<T> 与 u32 大小相同（4 字节）
        assert_eq!(std::mem::size_of::<CellIndex>(), 4);
        assert_eq!(std::mem::size_of::<WedgeIndex>(), 4);
    }

    #[test]
    fn test_ordering() {
        let a = WedgeIndex::new(1);
        let b = WedgeIndex::new(2);
        assert!(a < b);
    }

    #[test]
    fn test_display_debug() {
        let valid = CellIndex::new(42);
        assert_eq!(format!("{}", valid), "42");
        assert_eq!(format!("{:?}", valid), "Idx(42)");
        assert_eq!(format!("{}", CellIndex::INVALID), "INVALID");
    }

    #[test]
    fn test_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(VertexIndex::new(1));
        set.insert(VertexIndex::new(2));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&VertexIndex::new(1)));
    }

    #[test]
    fn test_convenience_functions() {
        assert_eq!(cell(0).index(), 0);
        assert_eq!(edge(1).index(), 1);
        assert_eq!(vertex(2).index(), 2);
        assert_eq!(corner(3).index(), 3);
        assert_eq!(wedge(4).index(), 4);
    }

    #[test]
    fn test_serialization() {
        let idx = CellIndex::new(42);
        let json = serde_json::to_string(&idx).unwrap();
        let deserialized: CellIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(idx, deserialized);
    }
}
