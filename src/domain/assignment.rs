// ==========================================
// 救灾物资调度系统 - 分配结果领域模型
// ==========================================
// 职责: 定义引擎输出 (AllocationOutcome) 与持久化实体 (Assignment)
// 红线: truck_id / resources_delivered 与 message 互斥,
//       由 AreaResult 枚举在类型层面强制
// ==========================================

use crate::domain::ResourceMap;
use crate::i18n;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// UnassignedReason - 未分配原因分类
// ==========================================
/// 未分配原因
///
/// 原因判定的优先级顺序（先命中先赢）:
/// 1) NoTravelInfo      - 没有任何车辆有该区域的行车时间
/// 2) MissingResourceType - 至少一种所需物资在所有车辆上都不存在
/// 3) TimeAndResource   - 时限与物资同时不满足
/// 4) TimeIssue         - 仅时限不满足
/// 5) ResourceIssue     - 仅物资数量不满足
/// 6) Unallocatable     - 兜底
///
/// 该顺序是固定契约，由测试锁定，不允许重排。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnassignedReason {
    NoTravelInfo,
    MissingResourceType,
    TimeAndResource,
    TimeIssue,
    ResourceIssue,
    Unallocatable,
}

impl UnassignedReason {
    /// 对应的 i18n 消息键
    pub fn message_key(&self) -> &'static str {
        match self {
            UnassignedReason::NoTravelInfo => "assignment.reason.no_travel_info",
            UnassignedReason::MissingResourceType => "assignment.reason.missing_resource_type",
            UnassignedReason::TimeAndResource => "assignment.reason.time_and_resource",
            UnassignedReason::TimeIssue => "assignment.reason.time_issue",
            UnassignedReason::ResourceIssue => "assignment.reason.resource_issue",
            UnassignedReason::Unallocatable => "assignment.reason.unallocatable",
        }
    }

    /// 渲染本地化诊断消息
    pub fn message(&self) -> String {
        i18n::t(self.message_key())
    }
}

// ==========================================
// AreaResult - 单区域分配结果（互斥变体）
// ==========================================
/// 单个区域的分配结果
///
/// Matched 与 Unmatched 互斥: 匹配成功必有 truck_id 和交付清单,
/// 匹配失败必有诊断原因，不存在中间状态。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AreaResult {
    /// 匹配成功
    Matched {
        truck_id: String,
        /// 实际承诺交付的物资（为区域需求清单的副本，而非车上剩余量）
        resources_delivered: ResourceMap,
    },
    /// 匹配失败（这不是错误，是正常的诊断结果）
    Unmatched { reason: UnassignedReason },
}

// ==========================================
// AllocationOutcome - 引擎输出
// ==========================================
/// 引擎对单个区域的输出，每个输入区域恰好产生一条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub area_id: String,
    pub result: AreaResult,
}

impl AllocationOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self.result, AreaResult::Matched { .. })
    }
}

// ==========================================
// Assignment - 分配结果持久化实体
// ==========================================
/// 分配结果记录
///
/// 可空字段语义（与 JSON 序列化一致，缺失 ≠ 空值）:
/// - 匹配成功: truck_id / resources_delivered 有值, message 为 None
/// - 匹配失败: message 有值, 其余为 None
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// 数据库自增主键（未持久化时为 None）
    #[serde(skip)]
    pub id: Option<i64>,

    /// 本次运行标识（同一次 process 的所有记录共享）
    pub run_id: String,

    /// 在本次运行中的处理序号（按紧急度排序后的顺序）
    pub seq_no: i64,

    pub area_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub truck_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources_delivered: Option<ResourceMap>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Assignment {
    /// 从引擎输出构造持久化实体
    ///
    /// 互斥不变式在这里由 AreaResult 枚举保证:
    /// 不可能同时出现 truck_id 与 message。
    pub fn from_outcome(
        outcome: AllocationOutcome,
        run_id: &str,
        seq_no: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        let (truck_id, resources_delivered, message) = match outcome.result {
            AreaResult::Matched {
                truck_id,
                resources_delivered,
            } => (Some(truck_id), Some(resources_delivered), None),
            AreaResult::Unmatched { reason } => (None, None, Some(reason.message())),
        };

        Self {
            id: None,
            run_id: run_id.to_string(),
            seq_no,
            area_id: outcome.area_id,
            truck_id,
            resources_delivered,
            message,
            created_at,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.truck_id.is_some()
    }
}
