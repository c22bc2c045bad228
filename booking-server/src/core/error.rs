//! 服务器启动错误
//!
//! 运行期的请求错误统一使用 `shared::AppError`；
//! 本类型只覆盖启动/绑定阶段的失败。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("数据库初始化失败: {0}")]
    Database(String),

    #[error("端口绑定失败: {0}")]
    Bind(#[from] std::io::Error),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
