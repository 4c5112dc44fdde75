//! Configurator - 手机壳定制向导引擎
//!
//! # 架构概述
//!
//! 把选项目录、当前选择和 AI 识别结果组合成一个可提交的订单：
//!
//! - **目录** (`catalog`): 原始记录规范化、按商品过滤、限时加载
//! - **向导** (`wizard`): 依赖解析、分步、选择状态机、步骤校验
//! - **计价** (`pricing`): 规格价 + 加购价 (rust_decimal)
//! - **识别** (`recognition`): 识别结果映射、型号不符检测、高亮定时器
//! - **提交** (`submission`): 有序带标签的订单选项
//! - **会话** (`session`): 将以上组件串成一次向导会话
//!
//! # 模块结构
//!
//! ```text
//! configurator/src/
//! ├── core/          # 配置、引擎规则
//! ├── catalog/       # 规范化、可用性过滤、加载
//! ├── wizard/        # 依赖、分步、状态机、校验
//! ├── pricing/       # 键分类、价格计算
//! ├── recognition/   # 匹配、不符检测、票据、高亮
//! ├── submission/    # 订单投影
//! ├── media/         # 参考图片处理、存储 URL
//! ├── utils/         # 日志
//! ├── richtext.rs    # 富文本预处理
//! ├── services.rs    # 外部协作者 trait
//! └── session.rs     # 向导会话
//! ```

pub mod catalog;
pub mod core;
pub mod media;
pub mod pricing;
pub mod recognition;
pub mod richtext;
pub mod services;
pub mod session;
pub mod submission;
pub mod utils;
pub mod wizard;

// Re-export 公共类型
pub use catalog::{Catalog, CatalogCache, CatalogSource, load_catalog, normalize_catalog};
pub use crate::core::{Config, EngineRules};
pub use pricing::{PriceBreakdown, SpecPricePolicy, calculate_price};
pub use recognition::{CaseMismatch, MismatchResolution, ReconcileReport};
pub use services::{
    AssetStorage, ImagePayload, RecognitionService, ServiceError, ServiceResult, SubmissionSink,
};
pub use session::{
    CatalogStatus, PendingRecognition, RecognitionOutcome, RecognitionView, WizardSession,
};
pub use wizard::{SelectOutcome, SelectionMachine, SelectionState, StepPlan};

// Re-export unified error types from shared
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use shared::{SelectionKey, TEXT_FALLBACK_SUFFIX};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 加载 .env、读取配置、初始化日志
pub fn setup_environment() -> anyhow::Result<Config> {
    // .env 不存在不是错误
    if let Err(e) = dotenv::dotenv()
        && !e.not_found()
    {
        return Err(anyhow::anyhow!("Failed to load .env: {}", e));
    }

    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    tracing::debug!(?config, "Configurator environment ready");
    Ok(config)
}
