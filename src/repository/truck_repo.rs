// ==========================================
// 救灾物资调度系统 - 运输车辆数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 管理 truck 表的 CRUD 操作
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{ResourceMap, TravelTimeMap, Truck};
use crate::repository::area_repo::parse_timestamp;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// TruckRepository - 车辆仓储
// ==========================================
pub struct TruckRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TruckRepository {
    /// 创建新的 TruckRepository 实例
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

    /// 插入新车辆
    ///
    /// # 返回
    /// - Err(AlreadyExists): truck_id 已存在
    pub fn insert(&self, truck: &Truck) -> RepositoryResult<()> {
        if self.exists(&truck.truck_id)? {
            return Err(RepositoryError::AlreadyExists {
                entity: "Truck".to_string(),
                id: truck.truck_id.clone(),
            });
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO truck (
                truck_id, available_resources, travel_time_to_area,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                truck.truck_id,
                serde_json::to_string(&truck.available_resources)?,
                serde_json::to_string(&truck.travel_time_to_area)?,
                truck.created_at.to_rfc3339(),
                truck.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// 判断车辆是否存在
    pub fn exists(&self, truck_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM truck WHERE truck_id = ?1",
            params![truck_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// 按主键查询
    pub fn find_by_id(&self, truck_id: &str) -> RepositoryResult<Option<Truck>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT truck_id, available_resources, travel_time_to_area,
                   created_at, updated_at
            FROM truck WHERE truck_id = ?1
            "#,
        )?;

        let result = stmt.query_row(params![truck_id], map_truck_row);

        match result {
            Ok(truck) => Ok(Some(truck?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询全部车辆（按插入顺序）
    ///
    /// 插入顺序即引擎首次适配的遍历顺序，因此按 rowid 排序。
    pub fn find_all(&self) -> RepositoryResult<Vec<Truck>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT truck_id, available_resources, travel_time_to_area,
                   created_at, updated_at
            FROM truck ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map([], map_truck_row)?;
        let mut trucks = Vec::new();
        for row in rows {
            trucks.push(row??);
        }
        Ok(trucks)
    }

    /// 更新车辆（主键不可变，更新其余字段并刷新 updated_at）
    pub fn update(&self, truck: &Truck) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE truck
            SET available_resources = ?2, travel_time_to_area = ?3, updated_at = ?4
            WHERE truck_id = ?1
            "#,
            params![
                truck.truck_id,
                serde_json::to_string(&truck.available_resources)?,
                serde_json::to_string(&truck.travel_time_to_area)?,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Truck".to_string(),
                id: truck.truck_id.clone(),
            });
        }
        Ok(())
    }

    /// 按主键删除
    pub fn delete(&self, truck_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM truck WHERE truck_id = ?1", params![truck_id])?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Truck".to_string(),
                id: truck_id.to_string(),
            });
        }
        Ok(())
    }
}

/// 行映射: truck 表 → Truck 实体
fn map_truck_row(row: &Row<'_>) -> rusqlite::Result<RepositoryResult<Truck>> {
    let available_json: String = row.get(1)?;
    let travel_json: String = row.get(2)?;
    let created_at: String = row.get(3)?;
    let updated_at: String = row.get(4)?;

    Ok((|| {
        let available_resources: ResourceMap = serde_json::from_str(&available_json)?;
        let travel_time_to_area: TravelTimeMap = serde_json::from_str(&travel_json)?;
        Ok(Truck {
            truck_id: row.get(0)?,
            available_resources,
            travel_time_to_area,
            created_at: parse_timestamp(&created_at),
            updated_at: parse_timestamp(&updated_at),
        })
    })())
}
