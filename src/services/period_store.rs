// src/services/period_store.rs

use tokio::sync::RwLock;

use crate::models::periods::{PeriodState, PeriodsUpdatePayload, WeekDescriptor, YearMonth};

// Dono do estado de períodos: vive do início ao fim do processo, não é persistido.
pub struct PeriodStore {
    state: RwLock<PeriodState>,
}

impl PeriodStore {
    pub fn new(current: YearMonth) -> Self {
        Self { state: RwLock::new(PeriodState::new(current)) }
    }

    pub async fn snapshot(&self) -> PeriodState {
        self.state.read().await.clone()
    }

    /// Última escrita vence; as invariantes são restauradas antes de liberar o lock.
    pub async fn update(&self, update: PeriodsUpdatePayload) -> PeriodState {
        let mut state = self.state.write().await;
        state.apply(update, YearMonth::current_utc());
        tracing::info!("🗓️ Períodos: {} meses liberados, padrão {}", state.allowed.len(), state.default);
        state.clone()
    }

    pub async fn set_weeks(&self, year_month: YearMonth, weeks: Vec<WeekDescriptor>) {
        tracing::info!("🗓️ {} semanas configuradas para {}", weeks.len(), year_month);
        self.state.write().await.set_weeks(year_month, weeks);
    }
}
