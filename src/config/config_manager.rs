// ==========================================
// Indicador Carimbadeira - 配置管理器
// ==========================================
// 职责: 目录与选项的加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::catalog::{
    join_ordered_list, parse_ordered_list, Catalog, DEFAULT_CARIMBADEIRAS, DEFAULT_COMPONENTES,
    DEFAULT_ORDER_CODE_MAX_DIGITS,
};
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::types::{GroupKey, OrderCodeStyle};
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 全局作用域
const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA 并建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;

        tracing::info!(config_key = key, value, "配置已更新");
        Ok(())
    }

    // ===== 目录 =====

    /// 读取有序列表；缺失或为空时回退默认值
    fn load_list(&self, key: &str, defaults: &[&str]) -> Result<Vec<String>, Box<dyn Error>> {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(defaults.iter().map(|v| v.to_string()).collect()),
        };

        let values = parse_ordered_list(&raw);
        if values.is_empty() {
            tracing::warn!(config_key = key, raw_value = %raw, "目录配置为空，使用默认值");
            Ok(defaults.iter().map(|v| v.to_string()).collect())
        } else {
            Ok(values)
        }
    }

    /// 读取某个分组字段的目录
    pub fn load_category_values(&self, key: GroupKey) -> Result<Vec<String>, Box<dyn Error>> {
        match key {
            GroupKey::Carimbadeira => self.load_list(config_keys::CARIMBADEIRAS, DEFAULT_CARIMBADEIRAS),
            GroupKey::Componente => self.load_list(config_keys::COMPONENTES, DEFAULT_COMPONENTES),
        }
    }

    /// 覆写某个分组字段的目录
    ///
    /// # 返回
    /// - Ok(Vec<String>): 规范化（去空白/去重）后实际写入的目录
    /// - Err: 目录为空、值含逗号或数据库错误
    pub fn set_category_values(
        &self,
        key: GroupKey,
        values: &[String],
    ) -> Result<Vec<String>, Box<dyn Error>> {
        if let Some(bad) = values.iter().find(|v| v.contains(',')) {
            return Err(format!("目录值不能包含逗号: {}", bad.trim()).into());
        }

        let normalized = parse_ordered_list(&values.join(","));
        if normalized.is_empty() {
            return Err(format!("目录不能为空: {}", key).into());
        }

        let config_key = match key {
            GroupKey::Carimbadeira => config_keys::CARIMBADEIRAS,
            GroupKey::Componente => config_keys::COMPONENTES,
        };
        self.set_global_config_value(config_key, &join_ordered_list(&normalized))?;
        Ok(normalized)
    }

    // ===== 订单号格式 =====

    fn load_order_code_style(&self) -> Result<OrderCodeStyle, Box<dyn Error>> {
        let style = self.get_config_or_default(config_keys::ORDER_CODE_STYLE, "SEPARATED")?;
        let max_digits = self
            .get_config_or_default(
                config_keys::ORDER_CODE_MAX_DIGITS,
                &DEFAULT_ORDER_CODE_MAX_DIGITS.to_string(),
            )?
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_ORDER_CODE_MAX_DIGITS);

        match style.trim().to_uppercase().as_str() {
            "SEPARATED" => Ok(OrderCodeStyle::Separated),
            "DIGITS_ONLY" => Ok(OrderCodeStyle::DigitsOnly { max_digits }),
            other => {
                tracing::warn!(
                    config_key = config_keys::ORDER_CODE_STYLE,
                    raw_value = other,
                    "订单号格式配置无效，使用 SEPARATED"
                );
                Ok(OrderCodeStyle::Separated)
            }
        }
    }

    fn load_componente_obrigatorio(&self) -> Result<bool, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::COMPONENTE_OBRIGATORIO, "true")?;
        Ok(!matches!(
            value.trim().to_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ))
    }

    /// 读取完整目录
    pub fn load_catalog(&self) -> Result<Catalog, Box<dyn Error>> {
        Ok(Catalog {
            carimbadeiras: self.load_category_values(GroupKey::Carimbadeira)?,
            componentes: self.load_category_values(GroupKey::Componente)?,
            order_code_style: self.load_order_code_style()?,
            componente_obrigatorio: self.load_componente_obrigatorio()?,
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 目录（逗号分隔，有序）
    pub const CARIMBADEIRAS: &str = "carimbadeiras";
    pub const COMPONENTES: &str = "componentes";

    // 录入选项
    pub const ORDER_CODE_STYLE: &str = "order_code_style"; // SEPARATED / DIGITS_ONLY
    pub const ORDER_CODE_MAX_DIGITS: &str = "order_code_max_digits";
    pub const COMPONENTE_OBRIGATORIO: &str = "componente_obrigatorio";
}
