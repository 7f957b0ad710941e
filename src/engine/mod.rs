// ==========================================
// 救灾物资调度系统 - 引擎层
// ==========================================
// 职责: 实现物资分配规则,不拼 SQL,无 I/O
// 红线: Engine 不拼 SQL, 所有未分配区域必须输出 reason
// ==========================================

pub mod allocator;
pub mod diagnosis;

// 重导出核心引擎
pub use allocator::AllocationEngine;
pub use diagnosis::DiagnosisClassifier;

use thiserror::Error;

/// 引擎层错误类型
///
/// 引擎自身只会报告一种错误: 输入快照不完整。
/// 单个区域匹配失败不是错误，而是带诊断消息的正常分配记录。
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{}", crate::i18n::t("engine.incomplete_data"))]
    IncompleteData,
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
