//! 解码配置。
//!
//! # 契约说明（What）
//! - [`DecodeOptions`] 默认值即标准行为：未注解字段绑定空键（按“未提供取值”报错）、
//!   不裁剪空白、不限制错误条数；
//! - 可通过 `with_*` 方法构造，也可从 TOML 片段加载：
//!
//! ```toml
//! unannotated = "skip"
//! trim_whitespace = true
//! max_errors = 16
//! ```

use serde::Deserialize;
use thiserror::Error;

/// 未声明绑定注解字段的处理策略。
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UnannotatedPolicy {
    /// 绑定到空键，永远不会命中：单值字段报告缺失，序列字段得到空序列。
    #[default]
    BindEmptyKey,
    /// 与不可设置字段一样整体跳过。
    Skip,
}

/// 配置加载失败。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse decode options: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("max_errors must be greater than zero")]
    ZeroErrorLimit,
}

/// 解码行为配置。
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeOptions {
    pub unannotated: UnannotatedPolicy,
    /// 数值解析前去掉取值两端的 ASCII 空白；字符串字段始终原样写入。
    pub trim_whitespace: bool,
    /// 记录的字段级错误上限，超出部分只计数。
    pub max_errors: Option<usize>,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unannotated(mut self, policy: UnannotatedPolicy) -> Self {
        self.unannotated = policy;
        self
    }

    pub fn with_trim_whitespace(mut self, trim: bool) -> Self {
        self.trim_whitespace = trim;
        self
    }

    pub fn with_max_errors(mut self, limit: usize) -> Self {
        self.max_errors = Some(limit);
        self
    }

    /// 从 TOML 文本加载配置并校验。
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_errors == Some(0) {
            return Err(ConfigError::ZeroErrorLimit);
        }
        Ok(())
    }
}
