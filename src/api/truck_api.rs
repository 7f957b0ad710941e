// ==========================================
// 救灾物资调度系统 - 车辆管理 API
// ==========================================
// 职责: 运输车辆的增删改查业务接口
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{validate_id_match, validate_truck};
use crate::domain::Truck;
use crate::i18n::t_with_args;
use crate::repository::TruckRepository;
use std::sync::Arc;
use tracing::info;

// ==========================================
// TruckApi - 车辆管理接口
// ==========================================
pub struct TruckApi {
    truck_repo: Arc<TruckRepository>,
}

impl TruckApi {
    /// 构造函数
    pub fn new(truck_repo: Arc<TruckRepository>) -> Self {
        Self { truck_repo }
    }

    /// 新增车辆
    ///
    /// # 返回
    /// - Err(InvalidInput): 字段校验失败
    /// - Err(AlreadyExists): truck_id 已存在
    pub fn add_truck(&self, truck: Truck) -> ApiResult<Truck> {
        validate_truck(&truck)?;
        self.truck_repo.insert(&truck)?;

        info!(truck_id = %truck.truck_id, "车辆已创建");
        Ok(truck)
    }

    /// 查询全部车辆（插入顺序，即首次适配的遍历顺序）
    pub fn list_trucks(&self) -> ApiResult<Vec<Truck>> {
        Ok(self.truck_repo.find_all()?)
    }

    /// 按主键查询
    pub fn get_truck(&self, truck_id: &str) -> ApiResult<Truck> {
        if truck_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("truck_id 不能为空".to_string()));
        }

        self.truck_repo
            .find_by_id(truck_id)?
            .ok_or_else(|| ApiError::NotFound(t_with_args("truck.not_found", &[("id", truck_id)])))
    }

    /// 更新车辆
    ///
    /// 路径参数与请求体的 truck_id 必须一致。
    pub fn update_truck(&self, truck_id: &str, truck: Truck) -> ApiResult<Truck> {
        validate_id_match(truck_id, &truck.truck_id, "truck_id")?;
        validate_truck(&truck)?;

        self.truck_repo.update(&truck)?;

        info!(truck_id = %truck.truck_id, "车辆已更新");
        Ok(truck)
    }

    /// 删除车辆
    pub fn delete_truck(&self, truck_id: &str) -> ApiResult<()> {
        if truck_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("truck_id 不能为空".to_string()));
        }

        self.truck_repo.delete(truck_id)?;

        info!(truck_id = %truck_id, "车辆已删除");
        Ok(())
    }
}
