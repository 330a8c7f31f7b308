// ==========================================
// Indicador Carimbadeira - 标签录入 API
// ==========================================
// 职责: 表单规范化 + 校验 + 误差计算 + 提交
// 红线: 任何校验失败都不产生部分提交
// 红线: 同一时刻只允许一个提交在途
// ==========================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::config::catalog::Catalog;
use crate::config::config_manager::ConfigManager;
use crate::domain::etiqueta::{EntryForm, Etiqueta, NovaEtiqueta};
use crate::domain::types::GroupKey;
use crate::engine::error::ValidationError;
use crate::engine::{to_quantity, ErrorPercentCalculator, OrderCodeFormatter};
use crate::perf::PerfGuard;
use crate::repository::etiqueta_repo::RecordStore;

// ==========================================
// EtiquetaApi - 标签录入 API
// ==========================================

/// 标签录入API
///
/// 职责：
/// 1. 订单号键入格式化
/// 2. 表单校验并组装 NovaEtiqueta（含误差百分比）
/// 3. 提交到记录存储（防重复提交）
pub struct EtiquetaApi {
    store: Arc<dyn RecordStore>,
    config_manager: Arc<ConfigManager>,
    calculator: ErrorPercentCalculator,
    in_flight: AtomicBool,
}

/// 在途标记；离开作用域时释放
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl EtiquetaApi {
    /// 创建新的EtiquetaApi实例
    pub fn new(store: Arc<dyn RecordStore>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            store,
            config_manager,
            calculator: ErrorPercentCalculator::new(),
            in_flight: AtomicBool::new(false),
        }
    }

    fn catalog(&self) -> ApiResult<Catalog> {
        self.config_manager
            .load_catalog()
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    /// 是否有提交在途（前端据此禁用保存按钮）
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// 键入时格式化订单号（按配置的格式）
    pub fn format_order_code(&self, raw: &str) -> ApiResult<String> {
        let catalog = self.catalog()?;
        Ok(OrderCodeFormatter::new(catalog.order_code_style).format(raw))
    }

    /// 校验表单并组装插入载荷
    ///
    /// # 返回
    /// - Ok(NovaEtiqueta): 已规范化、已计算误差的载荷
    /// - Err(ApiError::ValidationFailed): 第一个校验失败的字段
    pub fn validate(&self, form: &EntryForm) -> ApiResult<NovaEtiqueta> {
        let catalog = self.catalog()?;
        Ok(self.validate_with(&catalog, form)?)
    }

    fn validate_with(&self, catalog: &Catalog, form: &EntryForm) -> Result<NovaEtiqueta, ValidationError> {
        let op = OrderCodeFormatter::new(catalog.order_code_style).normalize(&form.op)?;

        let carimbadeira = form.carimbadeira.trim();
        if carimbadeira.is_empty() {
            return Err(ValidationError::MissingField {
                field: "carimbadeira".to_string(),
            });
        }
        if !catalog.contains(GroupKey::Carimbadeira, carimbadeira) {
            return Err(ValidationError::UnknownCategory {
                key: GroupKey::Carimbadeira,
                value: carimbadeira.to_string(),
            });
        }

        let componente = match form.componente.trim() {
            "" if catalog.componente_obrigatorio => {
                return Err(ValidationError::MissingField {
                    field: "componente".to_string(),
                })
            }
            "" => None,
            c if catalog.contains(GroupKey::Componente, c) => Some(c.to_string()),
            c => {
                return Err(ValidationError::UnknownCategory {
                    key: GroupKey::Componente,
                    value: c.to_string(),
                })
            }
        };

        let quantidade_etiqueta = to_quantity("quantidade_etiqueta", &form.quantidade_etiqueta)?;
        let quantidade_maquina = to_quantity("quantidade_maquina", &form.quantidade_maquina)?;
        let percentual_erro = self
            .calculator
            .compute(quantidade_etiqueta, quantidade_maquina)?;

        Ok(NovaEtiqueta {
            op,
            carimbadeira: carimbadeira.to_string(),
            componente,
            quantidade_etiqueta,
            quantidade_maquina,
            percentual_erro,
        })
    }

    /// 提交表单
    ///
    /// # 返回
    /// - Ok(Etiqueta): 已持久化的记录
    /// - Err(ApiError::SubmissionInProgress): 已有提交在途
    /// - Err(ApiError::ValidationFailed): 校验失败（未写入）
    /// - Err(存储错误): 写入失败（未写入）
    pub fn submit(&self, form: &EntryForm) -> ApiResult<Etiqueta> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("重复提交被拒绝");
            return Err(ApiError::SubmissionInProgress);
        }
        let _guard = InFlightGuard(&self.in_flight);
        let _perf = PerfGuard::new("etiqueta_submit");

        let nova = self.validate(form).map_err(|e| {
            tracing::info!(error = %e, "表单校验失败");
            e
        })?;

        let record = self.store.insert(&nova).map_err(|e| {
            tracing::error!(error = %e, op = %nova.op, "保存记录失败");
            ApiError::from(e)
        })?;

        tracing::info!(
            id = record.id,
            op = %record.op,
            carimbadeira = %record.carimbadeira,
            percentual_erro = record.percentual_erro,
            "记录已保存"
        );
        Ok(record)
    }
}
