// crates/lh_physics/src/numerics/dense.rs

//! 小规模稠密线性代数
//!
//! 节点求解器需要两种解法：
//! - 无约束顶点: 2x2 SPD 系统，闭式直接解
//! - 带 k 个对称面约束的顶点: (2+k)x(2+k) 鞍点系统，
//!   Householder QR 分解后回代
//!
//! 系统规模上限为 4x4（两个对称面），全部在栈外的小缓冲区上原地
//! 运算，不引入矩阵库。

use glam::{DMat2, DVec2};

/// 相对奇异判据
const SINGULAR_EPS: f64 = 1e-12;

/// 2x2 直接解 `m · x = b`
///
/// 行列式相对矩阵元素量级过小时返回 `None`（奇异系统）。
pub fn solve2(m: &DMat2, b: DVec2) -> Option<DVec2> {
    let scale = m
        .col(0)
        .abs()
        .max_element()
        .max(m.col(1).abs().max_element());
    let det = m.determinant();
    if scale <= 0.0 || det.abs() <= SINGULAR_EPS * scale * scale {
        return None;
    }
    Some(m.inverse() * b)
}

/// 原地 Householder QR 求解 `a · x = b`
///
/// `a` 为 n x n 行主序方阵，`b` 为右端项；解写回 `b` 的前 n 个
/// 元素。矩阵在消元过程中被破坏。对角元退化时返回 `None`。
pub fn solve_qr(a: &mut [f64], b: &mut [f64], n: usize) -> Option<()> {
    debug_assert_eq!(a.len(), n * n);
    debug_assert_eq!(b.len(), n);

    let scale = a.iter().fold(0.0f64, |m, &v| m.max(v.abs()));
    if scale <= 0.0 {
        return None;
    }

    // Householder 变换逐列消元
    for k in 0..n {
        // 第 k 列对角以下的范数
        let mut norm = 0.0;
        for i in k..n {
            norm += a[i * n + k] * a[i * n + k];
        }
        let norm = norm.sqrt();
        if norm <= SINGULAR_EPS * scale {
            return None;
        }

        let alpha = if a[k * n + k] > 0.0 { -norm } else { norm };
        // v = x - alpha·e_k（存入列空间的临时缓冲）
        let mut v = [0.0f64; 4];
        for i in k..n {
            v[i] = a[i * n + k];
        }
        v[k] -= alpha;
        let vtv: f64 = (k..n).map(|i| v[i] * v[i]).sum();
        if vtv <= 0.0 {
            return None;
        }

        // A <- (I - 2vv^T/v^Tv) A
        for j in k..n {
            let dot: f64 = (k..n).map(|i| v[i] * a[i * n + j]).sum();
            let factor = 2.0 * dot / vtv;
            for i in k..n {
                a[i * n + j] -= factor * v[i];
            }
        }
        // b <- (I - 2vv^T/v^Tv) b
        let dot: f64 = (k..n).map(|i| v[i] * b[i]).sum();
        let factor = 2.0 * dot / vtv;
        for i in k..n {
            b[i] -= factor * v[i];
        }
    }

    // 回代
    for k in (0..n).rev() {
        let diag = a[k * n + k];
        if diag.abs() <= SINGULAR_EPS * scale {
            return None;
        }
        let mut sum = b[k];
        for j in k + 1..n {
            sum -= a[k * n + j] * b[j];
        }
        b[k] = sum / diag;
    }

    Some(())
}

// ============================================================================
// 测试
// ============================================================================
