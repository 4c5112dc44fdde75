//! 核心模块 - 配置与引擎规则

pub mod config;
pub mod rules;

pub use config::Config;
pub use rules::EngineRules;
