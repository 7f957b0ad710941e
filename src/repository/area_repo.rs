// ==========================================
// 救灾物资调度系统 - 受灾区域数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 管理 area 表的 CRUD 操作
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{Area, ResourceMap};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

/// 区域检索条件（分页 + 可选过滤）
#[derive(Debug, Clone, Default)]
pub struct AreaSearchQuery {
    /// 按紧急等级过滤
    pub urgency_level: Option<i32>,
    /// 按所需物资名称过滤（要求 required_resources 含有该键）
    pub resource_name: Option<String>,
    /// 页码（从 1 开始）
    pub page_number: i64,
    /// 每页条数
    pub page_size: i64,
}

// ==========================================
// AreaRepository - 区域仓储
// ==========================================
pub struct AreaRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AreaRepository {
    /// 创建新的 AreaRepository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入新区域
    ///
    /// # 返回
    /// - Err(AlreadyExists): area_id 已存在
    pub fn insert(&self, area: &Area) -> RepositoryResult<()> {
        if self.exists(&area.area_id)? {
            return Err(RepositoryError::AlreadyExists {
                entity: "Area".to_string(),
                id: area.area_id.clone(),
            });
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO area (
                area_id, urgency_level, required_resources, time_constraint_hours,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                area.area_id,
                area.urgency_level,
                serde_json::to_string(&area.required_resources)?,
                area.time_constraint_hours,
                area.created_at.to_rfc3339(),
                area.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// 判断区域是否存在
    pub fn exists(&self, area_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM area WHERE area_id = ?1",
            params![area_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// 按主键查询
    ///
    /// # 返回
    /// - Ok(Some(Area)): 找到
    /// - Ok(None): 未找到
    pub fn find_by_id(&self, area_id: &str) -> RepositoryResult<Option<Area>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT area_id, urgency_level, required_resources, time_constraint_hours,
                   created_at, updated_at
            FROM area WHERE area_id = ?1
            "#,
        )?;

        let result = stmt.query_row(params![area_id], map_area_row);

        match result {
            Ok(area) => Ok(Some(area?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询全部区域（按插入顺序）
    ///
    /// 插入顺序即引擎的同级平局顺序，因此这里按 rowid 排序而非 area_id。
    pub fn find_all(&self) -> RepositoryResult<Vec<Area>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT area_id, urgency_level, required_resources, time_constraint_hours,
                   created_at, updated_at
            FROM area ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map([], map_area_row)?;
        let mut areas = Vec::new();
        for row in rows {
            areas.push(row??);
        }
        Ok(areas)
    }

    /// 分页检索（可按紧急等级/物资名称过滤，按 area_id 排序）
    pub fn search(&self, query: &AreaSearchQuery) -> RepositoryResult<Vec<Area>> {
        if query.page_number <= 0 || query.page_size <= 0 {
            return Err(RepositoryError::ValidationError(
                "page_number 与 page_size 必须大于 0".to_string(),
            ));
        }

        // 过滤条件涉及 JSON 列内容，在应用层完成
        let all = self.find_all()?;
        let filtered: Vec<Area> = all
            .into_iter()
            .filter(|a| {
                query
                    .urgency_level
                    .map(|lvl| a.urgency_level == lvl)
                    .unwrap_or(true)
                    && query
                        .resource_name
                        .as_deref()
                        .map(|name| a.required_resources.contains_key(name))
                        .unwrap_or(true)
            })
            .collect();

        let mut sorted = filtered;
        sorted.sort_by(|a, b| a.area_id.cmp(&b.area_id));

        let offset = ((query.page_number - 1) * query.page_size) as usize;
        Ok(sorted
            .into_iter()
            .skip(offset)
            .take(query.page_size as usize)
            .collect())
    }

    /// 更新区域（主键不可变，更新其余字段并刷新 updated_at）
    ///
    /// # 返回
    /// - Err(NotFound): area_id 不存在
    pub fn update(&self, area: &Area) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE area
            SET urgency_level = ?2, required_resources = ?3,
                time_constraint_hours = ?4, updated_at = ?5
            WHERE area_id = ?1
            "#,
            params![
                area.area_id,
                area.urgency_level,
                serde_json::to_string(&area.required_resources)?,
                area.time_constraint_hours,
                Utc::now().to_rfc3339(),
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Area".to_string(),
                id: area.area_id.clone(),
            });
        }
        Ok(())
    }

    /// 按主键删除
    ///
    /// # 返回
    /// - Err(NotFound): area_id 不存在
    pub fn delete(&self, area_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM area WHERE area_id = ?1", params![area_id])?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Area".to_string(),
                id: area_id.to_string(),
            });
        }
        Ok(())
    }
}

/// 行映射: area 表 → Area 实体
///
/// JSON 列解析错误延迟到外层转换为 RepositoryError
fn map_area_row(row: &Row<'_>) -> rusqlite::Result<RepositoryResult<Area>> {
    let required_json: String = row.get(2)?;
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;

    Ok((|| {
        let required_resources: ResourceMap = serde_json::from_str(&required_json)?;
        Ok(Area {
            area_id: row.get(0)?,
            urgency_level: row.get(1)?,
            required_resources,
            time_constraint_hours: row.get(3)?,
            created_at: parse_timestamp(&created_at),
            updated_at: parse_timestamp(&updated_at),
        })
    })())
}

/// RFC3339 时间戳解析，失败时退回 Unix 纪元
pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| DateTime::<Utc>::UNIX_EPOCH)
}
