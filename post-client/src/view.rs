//! Поколения представлений.
//!
//! Запросы не отменяются. Вместо этого перед запросом берётся [`ViewTicket`],
//! и результат применяется только если представление с тех пор не сменилось.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Default)]
/// Счётчик поколений одного представления. Клоны разделяют счётчик.
pub struct ViewGeneration {
    current: Arc<AtomicU64>,
}

#[derive(Debug, Clone)]
/// Отметка поколения, выданная перед асинхронной операцией.
pub struct ViewTicket {
    generation: ViewGeneration,
    issued: u64,
}

impl ViewGeneration {
    /// Новый счётчик.
    pub fn new() -> Self {
        Self::default()
    }

    /// Выдаёт отметку текущего поколения.
    pub fn ticket(&self) -> ViewTicket {
        ViewTicket {
            generation: self.clone(),
            issued: self.current.load(Ordering::Acquire),
        }
    }

    /// Делает все ранее выданные отметки устаревшими.
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::AcqRel);
    }
}

impl ViewTicket {
    /// `true`, пока представление не сменило поколение.
    pub fn is_current(&self) -> bool {
        self.generation.current.load(Ordering::Acquire) == self.issued
    }

    /// Возвращает значение, если отметка ещё актуальна.
    pub fn accept<T>(&self, value: T) -> Option<T> {
        self.is_current().then_some(value)
    }
}
