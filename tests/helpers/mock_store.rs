// ==========================================
// Mock 记录存储 - 用于集成测试
// ==========================================
// SwitchableStore: 包装真实存储，可随时切换为“失败”
// GatedStore: insert 阻塞直到测试放行（并发提交测试）
// ==========================================

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

use indicador_carimbadeira::repository::{RecordStore, RepositoryError, RepositoryResult};
use indicador_carimbadeira::{Etiqueta, NovaEtiqueta};

/// 可切换失败的记录存储
pub struct SwitchableStore {
    inner: Arc<dyn RecordStore>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    pub list_calls: AtomicUsize,
}

impl SwitchableStore {
    pub fn new(inner: Arc<dyn RecordStore>) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

impl RecordStore for SwitchableStore {
    fn insert(&self, nova: &NovaEtiqueta) -> RepositoryResult<Etiqueta> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::DatabaseConnectionError(
                "store unavailable".to_string(),
            ));
        }
        self.inner.insert(nova)
    }

    fn list_all(&self) -> RepositoryResult<Vec<Etiqueta>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::DatabaseConnectionError(
                "store unavailable".to_string(),
            ));
        }
        self.inner.list_all()
    }
}

/// insert 进入后通知测试，并阻塞直到收到放行信号
pub struct GatedStore {
    inner: Arc<dyn RecordStore>,
    entered: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

impl GatedStore {
    pub fn new(inner: Arc<dyn RecordStore>, entered: Sender<()>, release: Receiver<()>) -> Self {
        Self {
            inner,
            entered: Mutex::new(entered),
            release: Mutex::new(release),
        }
    }
}

impl RecordStore for GatedStore {
    fn insert(&self, nova: &NovaEtiqueta) -> RepositoryResult<Etiqueta> {
        self.entered
            .lock()
            .unwrap()
            .send(())
            .map_err(|e| RepositoryError::InternalError(e.to_string()))?;
        self.release
            .lock()
            .unwrap()
            .recv()
            .map_err(|e| RepositoryError::InternalError(e.to_string()))?;
        self.inner.insert(nova)
    }

    fn list_all(&self) -> RepositoryResult<Vec<Etiqueta>> {
        self.inner.list_all()
    }
}

/// list_all 读完数据后暂停（仅对武装后的第一次调用生效）
pub struct GatedListStore {
    inner: Arc<dyn RecordStore>,
    armed: AtomicBool,
    entered: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

impl GatedListStore {
    pub fn new(inner: Arc<dyn RecordStore>, entered: Sender<()>, release: Receiver<()>) -> Self {
        Self {
            inner,
            armed: AtomicBool::new(false),
            entered: Mutex::new(entered),
            release: Mutex::new(release),
        }
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

impl RecordStore for GatedListStore {
    fn insert(&self, nova: &NovaEtiqueta) -> RepositoryResult<Etiqueta> {
        self.inner.insert(nova)
    }

    fn list_all(&self) -> RepositoryResult<Vec<Etiqueta>> {
        let records = self.inner.list_all()?;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.entered
                .lock()
                .unwrap()
                .send(())
                .map_err(|e| RepositoryError::InternalError(e.to_string()))?;
            self.release
                .lock()
                .unwrap()
                .recv()
                .map_err(|e| RepositoryError::InternalError(e.to_string()))?;
        }
        Ok(records)
    }
}
