// ==========================================
// 救灾物资调度系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 物资分配决策引擎 (贪心一次分配)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 分配规则
pub mod engine;

// 缓存层 - 最新分配结果缓存
pub mod cache;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组件装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    AllocationOutcome, Area, AreaResult, Assignment, ResourceMap, TravelTimeMap, Truck,
    UnassignedReason,
};

// 引擎
pub use engine::{AllocationEngine, EngineError, EngineResult};

// 缓存
pub use cache::{AssignmentCache, CacheError, MemoryCache, LATEST_ASSIGNMENTS_KEY};

// API
pub use api::{AreaApi, AssignmentApi, TruckApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "救灾物资调度系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

// ==========================================
// 预编译检查
// ==========================================
