// crates/lh_physics/src/numerics/mod.rs

//! 数值工具
//!
//! - [`kahan`]: 补偿求和，用于守恒量诊断的确定性归约
//! - [`dense`]: 小规模稠密线性代数（2x2 直接解与 Householder QR）

pub mod dense;
pub mod kahan;

pub use dense::{solve2, solve_qr};
pub use kahan::KahanSum;
