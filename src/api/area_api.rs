// ==========================================
// 救灾物资调度系统 - 区域管理 API
// ==========================================
// 职责: 受灾区域的增删改查业务接口
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{validate_area, validate_id_match};
use crate::domain::Area;
use crate::i18n::t_with_args;
use crate::repository::area_repo::AreaSearchQuery;
use crate::repository::AreaRepository;
use std::sync::Arc;
use tracing::info;

// ==========================================
// AreaApi - 区域管理接口
// ==========================================
pub struct AreaApi {
    area_repo: Arc<AreaRepository>,
}

impl AreaApi {
    /// 构造函数
    pub fn new(area_repo: Arc<AreaRepository>) -> Self {
        Self { area_repo }
    }

    /// 新增区域
    ///
    /// # 返回
    /// - Err(InvalidInput): 字段校验失败
    /// - Err(AlreadyExists): area_id 已存在
    pub fn add_area(&self, area: Area) -> ApiResult<Area> {
        validate_area(&area)?;
        self.area_repo.insert(&area)?;

        info!(area_id = %area.area_id, urgency = area.urgency_level, "区域已创建");
        Ok(area)
    }

    /// 查询全部区域（插入顺序）
    pub fn list_areas(&self) -> ApiResult<Vec<Area>> {
        Ok(self.area_repo.find_all()?)
    }

    /// 分页查询区域
    pub fn list_areas_paged(&self, page_number: i64, page_size: i64) -> ApiResult<Vec<Area>> {
        if page_number <= 0 || page_size <= 0 {
            return Err(ApiError::InvalidInput(
                "page_number 与 page_size 必须大于 0".to_string(),
            ));
        }

        Ok(self.area_repo.search(&AreaSearchQuery {
            urgency_level: None,
            resource_name: None,
            page_number,
            page_size,
        })?)
    }

    /// 条件检索区域（按 area_id 排序）
    pub fn search_areas(&self, query: AreaSearchQuery) -> ApiResult<Vec<Area>> {
        if query.page_number <= 0 || query.page_size <= 0 {
            return Err(ApiError::InvalidInput(
                "page_number 与 page_size 必须大于 0".to_string(),
            ));
        }

        Ok(self.area_repo.search(&query)?)
    }

    /// 按主键查询
    ///
    /// # 返回
    /// - Err(NotFound): 区域不存在
    pub fn get_area(&self, area_id: &str) -> ApiResult<Area> {
        if area_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("area_id 不能为空".to_string()));
        }

        self.area_repo
            .find_by_id(area_id)?
            .ok_or_else(|| ApiError::NotFound(t_with_args("area.not_found", &[("id", area_id)])))
    }

    /// 更新区域
    ///
    /// 路径参数与请求体的 area_id 必须一致。
    pub fn update_area(&self, area_id: &str, area: Area) -> ApiResult<Area> {
        validate_id_match(area_id, &area.area_id, "area_id")?;
        validate_area(&area)?;

        self.area_repo.update(&area)?;

        info!(area_id = %area.area_id, "区域已更新");
        Ok(area)
    }

    /// 删除区域
    pub fn delete_area(&self, area_id: &str) -> ApiResult<()> {
        if area_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("area_id 不能为空".to_string()));
        }

        self.area_repo.delete(area_id)?;

        info!(area_id = %area_id, "区域已删除");
        Ok(())
    }
}
