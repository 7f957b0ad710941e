// ==========================================
// 救灾物资调度系统 - 分配结果数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 管理 assignment 表; 每次运行整体替换上一次的结果
// 约束: 替换必须在单个事务内完成（不保留历史运行）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{Assignment, ResourceMap};
use crate::repository::area_repo::parse_timestamp;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// AssignmentRepository - 分配结果仓储
// ==========================================
pub struct AssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AssignmentRepository {
    /// 创建新的 AssignmentRepository 实例
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

    /// 整体替换分配结果
    ///
    /// 删除上一次运行的全部记录并写入本次记录，单事务保证原子性:
    /// 读取方要么看到完整的旧结果，要么看到完整的新结果。
    ///
    /// # 返回
    /// - Ok(usize): 写入的记录数
    pub fn replace_all(&self, assignments: &[Assignment]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute("DELETE FROM assignment", [])?;

        let mut count = 0;
        for assignment in assignments {
            let resources_json = assignment
                .resources_delivered
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?;

            tx.execute(
                r#"
                INSERT INTO assignment (
                    run_id, seq_no, area_id, truck_id,
                    resources_delivered, message, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    assignment.run_id,
                    assignment.seq_no,
                    assignment.area_id,
                    assignment.truck_id,
                    resources_json,
                    assignment.message,
                    assignment.created_at.to_rfc3339(),
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 读取当前存储的全部分配结果（按运行内处理顺序）
    pub fn find_all(&self) -> RepositoryResult<Vec<Assignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, run_id, seq_no, area_id, truck_id,
                   resources_delivered, message, created_at
            FROM assignment ORDER BY seq_no
            "#,
        )?;

        let rows = stmt.query_map([], map_assignment_row)?;
        let mut assignments = Vec::new();
        for row in rows {
            assignments.push(row??);
        }
        Ok(assignments)
    }

    /// 当前存储的记录数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM assignment", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// 行映射: assignment 表 → Assignment 实体
fn map_assignment_row(row: &Row<'_>) -> rusqlite::Result<RepositoryResult<Assignment>> {
    let resources_json: Option<String> = row.get(5)?;
    let created_at: String = row.get(7)?;

    Ok((|| {
        let resources_delivered: Option<ResourceMap> = resources_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(Assignment {
            id: row.get(0)?,
            run_id: row.get(1)?,
            seq_no: row.get(2)?,
            area_id: row.get(3)?,
            truck_id: row.get(4)?,
            resources_delivered,
            message: row.get(6)?,
            created_at: parse_timestamp(&created_at),
        })
    })())
}
