// crates/lh_io/src/error.rs

//! 输出层错误类型

/// 输出错误
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 数据布局不符合写出器要求
    #[error("无效输出数据: {0}")]
    InvalidData(String),
}
