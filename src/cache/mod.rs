// ==========================================
// 救灾物资调度系统 - 结果缓存层
// ==========================================
// 职责: 保存最新一次分配结果的序列化副本（带 TTL）
// 定位: 纯读取加速; 缓存缺失/过期不是数据丢失,
//       读取方必须回退到 assignment 表
// ==========================================

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;

/// 最新分配结果的全局缓存键（进程内唯一的"最新运行"槽位）
pub const LATEST_ASSIGNMENTS_KEY: &str = "latest_assignments";

/// 缓存层错误类型
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("缓存不可用: {0}")]
    Unavailable(String),

    #[error("缓存锁获取失败: {0}")]
    LockError(String),
}

/// Result 类型别名
pub type CacheResult<T> = Result<T, CacheError>;

// ==========================================
// AssignmentCache - 缓存抽象
// ==========================================
/// 分配结果缓存接口
///
/// 值为序列化后的 JSON 字符串，序列化细节由调用方负责。
pub trait AssignmentCache: Send + Sync {
    /// 写入键值（带过期时间）
    fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// 读取键值
    ///
    /// # 返回
    /// - Ok(Some(String)): 命中且未过期
    /// - Ok(None): 未命中或已过期
    fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// 删除键
    fn delete(&self, key: &str) -> CacheResult<()>;
}

// ==========================================
// MemoryCache - 进程内缓存实现
// ==========================================

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// 进程内 TTL 缓存
///
/// 过期条目在读取时惰性清除。
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    /// 构造函数
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AssignmentCache for MemoryCache {
    fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::LockError(e.to_string()))?;

        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::LockError(e.to_string()))?;

        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                // 已过期，惰性清除
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn delete(&self, key: &str) -> CacheResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::LockError(e.to_string()))?;

        entries.remove(key);
        Ok(())
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let cache = MemoryCache::new();

        cache
            .set("k1", "v1", Duration::from_secs(60))
            .unwrap();
        assert_eq!(cache.get("k1").unwrap().as_deref(), Some("v1"));

        cache.delete("k1").unwrap();
        assert_eq!(cache.get("k1").unwrap(), None);
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = MemoryCache::new();

        cache.set("k1", "v1", Duration::from_millis(0)).unwrap();
        // TTL 为 0，写入即过期
        assert_eq!(cache.get("k1").unwrap(), None);
    }

    #[test]
    fn test_overwrite_refreshes_value() {
        let cache = MemoryCache::new();

        cache.set("k1", "old", Duration::from_secs(60)).unwrap();
        cache.set("k1", "new", Duration::from_secs(60)).unwrap();
        assert_eq!(cache.get("k1").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_missing_key_is_none_not_error() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("absent").unwrap(), None);
    }
}
