// ==========================================
// 救灾物资调度系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::{AreaApi, AssignmentApi, TruckApi};
use crate::cache::MemoryCache;
use crate::config::ConfigManager;
use crate::db::{configure_sqlite_connection, ensure_schema};
use crate::repository::{AreaRepository, AssignmentRepository, TruckRepository};
use rusqlite::Connection;

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 区域管理API
    pub area_api: Arc<AreaApi>,

    /// 车辆管理API
    pub truck_api: Arc<TruckApi>,

    /// 分配运行API
    pub assignment_api: Arc<AssignmentApi>,

    /// 配置管理器
    pub config: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享数据库连接并初始化 schema
    /// 2. 初始化所有Repository
    /// 3. 读取配置（缓存 TTL、界面语言）
    /// 4. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = Connection::open(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        configure_sqlite_connection(&conn).map_err(|e| format!("连接配置失败: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("schema 初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let area_repo = Arc::new(AreaRepository::from_connection(Arc::clone(&conn)));
        let truck_repo = Arc::new(TruckRepository::from_connection(Arc::clone(&conn)));
        let assignment_repo = Arc::new(AssignmentRepository::from_connection(Arc::clone(&conn)));
        let config = Arc::new(ConfigManager::from_connection(Arc::clone(&conn)));

        // ==========================================
        // 读取配置
        // ==========================================
        let ttl_minutes = config
            .cache_ttl_minutes()
            .map_err(|e| format!("配置读取失败: {}", e))?;
        let locale = config
            .app_locale()
            .map_err(|e| format!("配置读取失败: {}", e))?;
        crate::i18n::set_locale(&locale);

        // ==========================================
        // 初始化缓存与API层
        // ==========================================
        let cache = Arc::new(MemoryCache::new());

        let area_api = Arc::new(AreaApi::new(Arc::clone(&area_repo)));
        let truck_api = Arc::new(TruckApi::new(Arc::clone(&truck_repo)));
        let assignment_api = Arc::new(AssignmentApi::new(
            area_repo,
            truck_repo,
            assignment_repo,
            cache,
            Duration::from_secs(ttl_minutes * 60),
        ));

        tracing::info!("AppState初始化成功 (缓存TTL: {}分钟)", ttl_minutes);

        Ok(Self {
            db_path,
            area_api,
            truck_api,
            assignment_api,
            config,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先使用系统数据目录，不可用时退回当前目录。
pub fn get_default_db_path() -> String {
    dirs::data_dir()
        .map(|dir| {
            dir.join("relief-dispatch")
                .join("relief.db")
                .to_string_lossy()
                .to_string()
        })
        .unwrap_or_else(|| "relief.db".to_string())
}
