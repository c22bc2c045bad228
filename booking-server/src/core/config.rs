/// 服务器配置 - 预订引擎的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/heron/booking | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | HOLD_TTL_MINUTES | 5 | Hold 存活时间 (分钟) |
/// | MAX_PARTY_SIZE | 20 | 单次预订最大人数 |
/// | CORS_ALLOWED_ORIGINS | * | 允许的 CORS 来源 (逗号分隔) |
/// | TENANTS | demo:Demo Restaurant | 租户目录 (id:name, 逗号分隔) |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时 (毫秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/heron HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// Hold 存活时间 (分钟)
    pub hold_ttl_minutes: i64,
    /// 单次预订最大人数 (租户可配置上限的默认值)
    pub max_party_size: i32,
    /// 允许的 CORS 来源 ("*" 或逗号分隔的 origin 列表)
    pub cors_allowed_origins: String,
    /// 租户目录 "id:display name" 条目，逗号分隔
    pub tenants: String,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/heron/booking".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            hold_ttl_minutes: std::env::var("HOLD_TTL_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5),
            max_party_size: std::env::var("MAX_PARTY_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(20),
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".into()),
            tenants: std::env::var("TENANTS")
                .unwrap_or_else(|_| "demo:Demo Restaurant".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
        }
    }

    /// 数据库文件路径
    pub fn db_path(&self) -> String {
        format!("{}/booking.db", self.work_dir)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = Config {
            work_dir: "/tmp/heron".into(),
            http_port: 3000,
            environment: "development".into(),
            hold_ttl_minutes: 5,
            max_party_size: 20,
            cors_allowed_origins: "*".into(),
            tenants: "demo:Demo Restaurant".into(),
            request_timeout_ms: 30000,
        };
        assert_eq!(config.db_path(), "/tmp/heron/booking.db");
        assert!(!config.is_production());
    }
}
