// ==========================================
// 救灾物资调度系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供上层调用
// ==========================================

pub mod area_api;
pub mod assignment_api;
pub mod error;
pub mod truck_api;
pub mod validator;

// 重导出核心类型
pub use area_api::AreaApi;
pub use assignment_api::AssignmentApi;
pub use error::{ApiError, ApiResult};
pub use truck_api::TruckApi;
