use std::time::Duration;

use crate::pricing::SpecPricePolicy;

/// 配置器配置 - 向导会话的所有可调项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | CACHE_READ_TIMEOUT_MS | 1500 | 单次缓存读取的最长等待(毫秒) |
/// | HIGHLIGHT_CLEAR_MS | 2000 | AI 匹配高亮自动清除延迟(毫秒) |
/// | MAX_UPLOAD_BYTES | 4194304 | 参考图片大小上限 |
/// | MAX_IMAGE_DIMENSION | 2048 | 参考图片最长边上限 |
/// | PROTECTION_GROUP_KEY | protection | 保护层选项组 |
/// | EMBOSSING_GROUP_KEY | embossing | 浮雕选项组 |
/// | REFERENCE_IMAGE_BUCKET | design-assets | 参考图片存储桶 |
/// | SPEC_PRICE_POLICY | item_or_group | 规格计价策略 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 日志文件目录 |
///
/// # 示例
///
/// ```ignore
/// CACHE_READ_TIMEOUT_MS=500 SPEC_PRICE_POLICY=item_plus_group cargo test
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 单次缓存读取超时 (毫秒)，超时按空集合处理
    pub cache_read_timeout_ms: u64,
    /// AI 匹配高亮清除延迟 (毫秒)
    pub highlight_clear_ms: u64,
    /// 参考图片大小上限 (字节)
    pub max_upload_bytes: usize,
    /// 参考图片最长边上限 (像素)
    pub max_image_dimension: u32,
    /// 保护层选项组 key
    pub protection_group_key: String,
    /// 浮雕选项组 key
    pub embossing_group_key: String,
    /// 参考图片存储桶
    pub reference_image_bucket: String,
    /// 规格 (step 1) 计价策略
    pub spec_price_policy: SpecPricePolicy,
    /// 日志级别
    pub log_level: String,
    /// 日志文件目录 (None = 仅输出到终端)
    pub log_dir: Option<String>,
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            cache_read_timeout_ms: env_parse("CACHE_READ_TIMEOUT_MS", 1500),
            highlight_clear_ms: env_parse("HIGHLIGHT_CLEAR_MS", 2000),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", 4 * 1024 * 1024),
            max_image_dimension: env_parse("MAX_IMAGE_DIMENSION", 2048),
            protection_group_key: std::env::var("PROTECTION_GROUP_KEY")
                .unwrap_or_else(|_| "protection".into()),
            embossing_group_key: std::env::var("EMBOSSING_GROUP_KEY")
                .unwrap_or_else(|_| "embossing".into()),
            reference_image_bucket: std::env::var("REFERENCE_IMAGE_BUCKET")
                .unwrap_or_else(|_| "design-assets".into()),
            spec_price_policy: env_parse("SPEC_PRICE_POLICY", SpecPricePolicy::default()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
        }
    }

    /// 缓存读取超时
    pub fn cache_read_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_read_timeout_ms)
    }

    /// 高亮清除延迟
    pub fn highlight_delay(&self) -> Duration {
        Duration::from_millis(self.highlight_clear_ms)
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
    fn test_env_parse_falls_back_on_garbage() {
        assert_eq!(env_parse("CONFIGURATOR_TEST_UNSET_VARIABLE", 42u64), 42);
    }

    #[test]
    fn test_durations() {
        let mut config = Config::from_env();
        config.cache_read_timeout_ms = 250;
        config.highlight_clear_ms = 10;
        assert_eq!(config.cache_read_timeout(), Duration::from_millis(250));
        assert_eq!(config.highlight_delay(), Duration::from_millis(10));
    }
}
