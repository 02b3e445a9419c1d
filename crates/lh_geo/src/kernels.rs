// crates/lh_geo/src/kernels.rs

//! 平面几何内核
//!
//! 多边形面积（鞋带公式）、形心、最小顶点间距，以及线段的
//! 长度/中点/外法向。逆时针（CCW）顶点环的符号面积为正。

use glam::DVec2;

/// 多边形符号面积（鞋带公式）
///
/// 逆时针环为正，顺时针环为负。
///
/// # 示例
///
/// ```
/// use glam::DVec2;
/// use lh_geo::polygon_signed_area;
///
/// let unit_square = [
///     DVec2::new(0.0, 0.0),
///     DVec2::new(1.0, 0.0),
///     DVec2::new(1.0, 1.0),
///     DVec2::new(0.0, 1.0),
/// ];
/// assert!((polygon_signed_area(&unit_square) - 1.0).abs() < 1e-14);
/// ```
pub fn polygon_signed_area(ring: &[DVec2]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        twice_area += a.x * b.y - b.x * a.y;
    }
    0.5 * twice_area
}

/// 多边形形心
///
/// 标准的面积加权形心公式。面积退化（接近零）时回退为顶点平均，
/// 避免除零产生 NaN。
pub fn polygon_centroid(ring: &[DVec2]) -> DVec2 {
    let n = ring.len();
    if n == 0 {
        return DVec2::ZERO;
    }
    let area = polygon_signed_area(ring);
    if area.abs() < 1e-300 {
        let sum: DVec2 = ring.iter().copied().sum();
        return sum / n as f64;
    }
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let cross = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    DVec2::new(cx, cy) / (6.0 * area)
}

/// 多边形最小顶点间距
///
/// 对所有无序顶点对做暴力枚举，以 `seed` 作为初始值
/// （调用方通常传入最短关联边长）。
pub fn polygon_min_length(ring: &[DVec2], seed: f64) -> f64 {
    let mut min_length = seed;
    for (i, &pi) in ring.iter().enumerate() {
        for &pj in &ring[i + 1..] {
            min_length = min_length.min(pi.distance(pj));
        }
    }
    min_length
}

/// 线段长度
#[inline]
pub fn segment_length(a: DVec2, b: DVec2) -> f64 {
    a.distance(b)
}

/// 线段中点
#[inline]
pub fn segment_midpoint(a: DVec2, b: DVec2) -> DVec2 {
    0.5 * (a + b)
}

/// 线段外法向（单位向量）
///
/// 对于按 CCW 环方向遍历 `a -> b` 的边，外法向指向单元外侧，
/// 即切向量顺时针旋转 90°。长度退化的线段返回零向量。
#[inline]
pub fn segment_outward_normal(a: DVec2, b: DVec2) -> DVec2 {
    let t = b - a;
    let len = t.length();
    if len < 1e-300 {
        return DVec2::ZERO;
    }
    DVec2::new(t.y, -t.x) / len
}

// ============================================================================
// 测试
// ============================================================================
