// crates/lh_mesh/src/topology.rs

//! 网格拓扑连接性存储
//!
//! 提供 CSR (Compressed Sparse Row) 格式的连接性表。
//!
//! # 设计说明
//!
//! CSR 是紧凑的变长行存储格式：
//! - `offsets[i]` 和 `offsets[i+1]` 之间的元素是第 i 行的内容
//! - 内存紧凑，缓存友好
//! - 适合一次构建后的只读迭代，不支持动态修改
//!
//! # 示例
//!
//! ```
//! use lh_mesh::topology::CsrConnectivity;
//!
//! // 三个单元，每个单元引用不同数量的顶点
//! let csr = CsrConnectivity::from_rows([
//!     vec![0, 1, 2],
//!     vec![1, 2, 3, 4],
//!     vec![2, 3],
//! ]);
//!
//! assert_eq!(csr.row(0), &[0, 1, 2]);
//! assert_eq!(csr.row(1), &[1, 2, 3, 4]);
//! assert_eq!(csr.n_rows(), 3);
//! ```

use serde::{Deserialize, Serialize};

/// CSR 连接性表
///
/// 实体索引统一使用 u32 存储。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrConnectivity {
    offsets: Vec<usize>,
    indices: Vec<u32>,
}

impl CsrConnectivity {
    /// 由偏移数组与索引数组直接构造
    ///
    /// 调用方保证 `offsets` 单调不减且首尾与 `indices` 长度一致。
    pub fn new(offsets: Vec<usize>, indices: Vec<u32>) -> Self {
        debug_assert!(!offsets.is_empty());
        debug_assert_eq!(*offsets.last().unwrap(), indices.len());
        Self { offsets, indices }
    }

    /// 创建空表
    pub fn empty() -> Self {
        Self {
            offsets: vec![0],
            indices: Vec::new(),
        }
    }

    /// 由行集合构造
    pub fn from_rows<R, I>(rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = u32>,
    {
        let mut offsets = vec![0usize];
        let mut indices = Vec::new();
        for row in rows {
            indices.extend(row);
            offsets.push(indices.len());
        }
        Self { offsets, indices }
    }

    /// 行数
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.offsets.len() - 1
    }

    /// 非零元素总数
    #[inline]
    pub fn n_entries(&self) -> usize {
        self.indices.len()
    }

    /// 第 `row` 行的内容
    #[inline]
    pub fn row(&self, row: usize) -> &[u32] {
        let start = self.offsets[row];
        let end = self.offsets[row + 1];
        &self.indices[start..end]
    }

    /// 第 `row` 行的长度
    #[inline]
    pub fn row_len(&self, row: usize) -> usize {
        self.offsets[row + 1] - self.offsets[row]
    }

    /// 迭代所有行
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        (0..self.n_rows()).map(move |i| self.row(i))
    }

    /// 偏移数组
    #[inline]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// 索引数组
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// 由"元素 -> 行"的映射转置构建（计数排序）
    ///
    /// `targets[i]` 给出第 i 个源实体指向的目标实体，返回
    /// "目标实体 -> 源实体列表" 的 CSR 表，行内保持源实体升序。
    pub fn inverse_of(targets: &[u32], n_targets: usize) -> Self {
        let mut counts = vec![0usize; n_targets + 1];
        for &t in targets {
            counts[t as usize + 1] += 1;
        }
        for i in 0..n_targets {
            counts[i + 1] += counts[i];
        }
        let offsets = counts.clone();
        let mut cursor = counts;
        let mut indices = vec![0u32; targets.len()];
        for (src, &t) in targets.iter().enumerate() {
            indices[cursor[t as usize]] = src as u32;
            cursor[t as usize] += 1;
        }
        Self { offsets, indices }
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let csr = CsrConnectivity::from_rows([vec![0u32, 1, 2], vec![1, 2, 3, 4], vec![2, 3]]);
        assert_eq!(csr.n_rows(), 3);
        assert_eq!(csr.n_entries(), 9);
        assert_eq!(csr.row(0), &[0, 1, 2]);
        assert_eq!(csr.row(1), &[1, 2, 3, 4]);
        assert_eq!(csr.row(2), &[2, 3]);
        assert_eq!(csr.row_len(1), 4);
    }

    #[test]
    fn test_empty() {
        let csr = CsrConnectivity::empty();
        assert_eq!(csr.n_rows(), 0);
        assert_eq!(csr.n_entries(), 0);
    }

    #[test]
    fn test_rows_iter() {
        let csr = CsrConnectivity::from_rows([vec![5u32], vec![6, 7]]);
        let collected: Vec<Vec<u32>> = csr.rows().map(|r| r.to_vec()).collect();
        assert_eq!(collected, vec![vec![5], vec![6, 7]]);
    }

    #[test]
    fn test_inverse_of() {
        // 四个角分别指向顶点 [1, 0, 1, 2]
        let corner_vertex = [1u32, 0, 1, 2];
        let vertex_corners = CsrConnectivity::inverse_of(&corner_vertex, 3);
        assert_eq!(vertex_corners.row(0), &[1]);
        assert_eq!(vertex_corners.row(1), &[0, 2]);
        assert_eq!(vertex_corners.row(2), &[3]);
    }

    #[test]
    fn test_inverse_of_empty_rows() {
        let targets = [2u32, 2];
        let inv = CsrConnectivity::inverse_of(&targets, 4);
        assert_eq!(inv.row(0), &[] as &[u32]);
        assert_eq!(inv.row(1), &[] as &[u32]);
        assert_eq!(inv.row(2), &[0, 1]);
        assert_eq!(inv.row(3), &[] as &[u32]);
    }
}
