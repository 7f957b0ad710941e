// ==========================================
// 救灾物资调度系统 - 分配运行 API
// ==========================================
// 职责: 编排一次完整的分配运行
//   快照读取 → 引擎分配 → 整体替换存储 → 刷新缓存
// 约束:
// - 存储替换与缓存刷新视为一个逻辑步骤;
//   缓存刷新失败时删除旧缓存（尽力而为），绝不让过期缓存冒充新结果
// - 读取路径缓存优先，未命中/过期/故障一律回退到存储层
// ==========================================

use crate::api::error::ApiResult;
use crate::cache::{AssignmentCache, LATEST_ASSIGNMENTS_KEY};
use crate::domain::Assignment;
use crate::engine::AllocationEngine;
use crate::repository::{AreaRepository, AssignmentRepository, TruckRepository};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ==========================================
// AssignmentApi - 分配运行接口
// ==========================================
pub struct AssignmentApi {
    area_repo: Arc<AreaRepository>,
    truck_repo: Arc<TruckRepository>,
    assignment_repo: Arc<AssignmentRepository>,
    cache: Arc<dyn AssignmentCache>,
    engine: AllocationEngine,
    cache_ttl: Duration,
}

impl AssignmentApi {
    /// 构造函数
    ///
    /// # 参数
    /// - cache_ttl: 最新分配结果在缓存中的保留时长
    pub fn new(
        area_repo: Arc<AreaRepository>,
        truck_repo: Arc<TruckRepository>,
        assignment_repo: Arc<AssignmentRepository>,
        cache: Arc<dyn AssignmentCache>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            area_repo,
            truck_repo,
            assignment_repo,
            cache,
            engine: AllocationEngine::new(),
            cache_ttl,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行一次分配运行并持久化结果
    ///
    /// 流程:
    /// 1) 读取区域/车辆快照（存储层故障直接向上传播，运行中止）
    /// 2) 引擎分配（快照为空 → PreconditionFailed，不落任何数据）
    /// 3) 整体替换 assignment 表（单事务）
    /// 4) 刷新缓存; 刷新失败时删除旧缓存，避免过期数据冒充新结果
    ///
    /// # 返回
    /// - Ok(Vec<Assignment>): 本次运行的全部记录（按处理顺序）
    #[instrument(skip(self))]
    pub fn process_assignments(&self) -> ApiResult<Vec<Assignment>> {
        let areas = self.area_repo.find_all()?;
        let trucks = self.truck_repo.find_all()?;

        let outcomes = self.engine.allocate(&areas, &trucks)?;

        let run_id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let assignments: Vec<Assignment> = outcomes
            .into_iter()
            .enumerate()
            .map(|(seq, outcome)| {
                Assignment::from_outcome(outcome, &run_id, seq as i64, created_at)
            })
            .collect();

        let written = self.assignment_repo.replace_all(&assignments)?;

        let matched = assignments.iter().filter(|a| a.is_matched()).count();
        info!(
            run_id = %run_id,
            total = written,
            matched,
            unmatched = written - matched,
            "分配运行完成"
        );

        self.refresh_cache(&assignments);

        Ok(assignments)
    }

    /// 读取最新分配结果（缓存优先，回退存储）
    ///
    /// 缓存未命中、过期、反序列化失败、缓存层故障都不是错误，
    /// 一律回退到 assignment 表。
    #[instrument(skip(self))]
    pub fn get_latest_assignments(&self) -> ApiResult<Vec<Assignment>> {
        match self.cache.get(LATEST_ASSIGNMENTS_KEY) {
            Ok(Some(serialized)) => match serde_json::from_str::<Vec<Assignment>>(&serialized) {
                Ok(assignments) => {
                    info!(count = assignments.len(), "命中分配结果缓存");
                    return Ok(assignments);
                }
                Err(e) => {
                    warn!("缓存内容反序列化失败，回退到存储层: {}", e);
                }
            },
            Ok(None) => {
                info!("分配结果缓存未命中，回退到存储层");
            }
            Err(e) => {
                warn!("缓存读取失败，回退到存储层: {}", e);
            }
        }

        Ok(self.assignment_repo.find_all()?)
    }

    /// 删除最新分配结果缓存
    pub fn invalidate_cache(&self) -> ApiResult<()> {
        self.cache.delete(LATEST_ASSIGNMENTS_KEY)?;
        info!("分配结果缓存已删除");
        Ok(())
    }

    // ==========================================
    // 缓存刷新
    // ==========================================

    /// 刷新最新分配结果缓存（尽力而为）
    ///
    /// 存储已写入成功，缓存刷新失败不应让本次运行失败;
    /// 但必须删除旧条目，不能让过期缓存在新存储之后继续存活。
    fn refresh_cache(&self, assignments: &[Assignment]) {
        let serialized = match serde_json::to_string(assignments) {
            Ok(json) => json,
            Err(e) => {
                warn!("分配结果序列化失败，删除旧缓存: {}", e);
                self.drop_stale_cache();
                return;
            }
        };

        if let Err(e) = self
            .cache
            .set(LATEST_ASSIGNMENTS_KEY, &serialized, self.cache_ttl)
        {
            warn!("缓存刷新失败，删除旧缓存: {}", e);
            self.drop_stale_cache();
        }
    }

    fn drop_stale_cache(&self) {
        if let Err(e) = self.cache.delete(LATEST_ASSIGNMENTS_KEY) {
            warn!("旧缓存删除失败，等待 TTL 过期: {}", e);
        }
    }
}
