// ==========================================
// Indicador Carimbadeira - 核心库
// ==========================================
// 技术栈: Tauri + Rust + SQLite
// 系统定位: 贴标机 (carimbadeira) 计数误差录入与汇总
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "pt-BR");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 记录存储
pub mod repository;

// 引擎层 - 规范化 / 误差计算 / 汇总
pub mod engine;

// 配置层 - 机台与部件目录
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// SQL 性能统计
pub mod perf;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配与 Tauri 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{EntryForm, ErrorSummary, Etiqueta, GroupKey, GroupMean, NovaEtiqueta};

pub use engine::{
    format_order_code, strip_non_digits, AggregationEngine, ErrorPercentCalculator,
    OrderCodeFormatter, OrderCodeStyle, ValidationError,
};

pub use api::{ConfigApi, DashboardApi, EtiquetaApi, Notification, NotificationKind};

pub use repository::{RecordStore, SqliteEtiquetaRepository};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Indicador Carimbadeira";
