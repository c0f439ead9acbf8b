// src/db/mock.rs

use std::{
    collections::{BTreeSet, HashMap},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::{Datelike, Local};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::{
    common::error::BackendError,
    db::{
        backend::{BackendKind, BackendSession, SalesBackend},
        procedures::{self, ProcedureCall},
        value::{Record, Recordset},
    },
    models::periods::YearMonth,
};

pub const DEFAULT_PERMISSION: &str = "datos_personales";

pub struct MockUser {
    pub id: i64,
    pub username: &'static str,
    pub password: Option<&'static str>,
    pub role: &'static str,
    pub active: bool,
}

// Mesmos usuários que o script de setup cria no banco.
pub const MOCK_USERS: [MockUser; 3] = [
    MockUser { id: 1, username: "henryoo", password: Some("Admin*2025!"), role: "Administrador", active: true },
    MockUser { id: 2, username: "harold", password: Some("Venta*2025!"), role: "Vendedor", active: true },
    MockUser { id: 3, username: "luis", password: None, role: "Vendedor", active: false },
];

// Amostra fixa de vendas: (vendedor, usuário vinculado, centavos por semana S1..S5).
const SALES_SAMPLE: [(&str, Option<i64>, [i64; 5]); 4] = [
    ("Harold Rojas", Some(2), [125_050, 98_025, 143_000, 110_075, 0]),
    ("Ana Pérez", None, [210_000, 187_550, 199_990, 205_010, 45_000]),
    ("Juan Gómez", None, [87_500, 92_025, 101_000, 79_980, 12_500]),
    ("Luis Soto", Some(3), [0, 15_000, 22_575, 18_000, 0]),
];

fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

struct MockData {
    permissions: HashMap<i64, String>,
    visible_months: BTreeSet<YearMonth>,
}

// Backend em memória: responde aos mesmos stored procedures que o SQL Server.
#[derive(Clone)]
pub struct MockBackend {
    data: Arc<Mutex<MockData>>,
    open_sessions: Arc<AtomicUsize>,
}

impl MockBackend {
    pub fn seeded() -> Self {
        Self {
            data: Arc::new(Mutex::new(MockData {
                permissions: HashMap::new(),
                visible_months: BTreeSet::from([YearMonth::current()]),
            })),
            open_sessions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sessões abertas e ainda não fechadas.
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SalesBackend for MockBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Mock
    }

    async fn open(&self) -> Result<Box<dyn BackendSession>, BackendError> {
        self.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            data: self.data.clone(),
            open_sessions: self.open_sessions.clone(),
        }))
    }
}

struct MockSession {
    data: Arc<Mutex<MockData>>,
    open_sessions: Arc<AtomicUsize>,
}

fn missing(call: &ProcedureCall, param: &str) -> BackendError {
    BackendError::Procedure(format!("{} espera el parámetro @{}", call.name, param))
}

fn year_month_param(call: &ProcedureCall) -> Result<YearMonth, BackendError> {
    let raw = call.text("YearMonth").ok_or_else(|| missing(call, "YearMonth"))?;
    raw.parse()
        .map_err(|e: crate::models::periods::InvalidYearMonth| BackendError::Procedure(e.to_string()))
}

// Semana corrente do mês pedido: meses passados fecham em S5, futuros começam em S1.
fn current_week(year_month: YearMonth) -> i64 {
    let today = Local::now().date_naive();
    let current = YearMonth::from_date(today);
    if year_month < current {
        5
    } else if year_month > current {
        1
    } else {
        i64::from((today.day() - 1) / 7 + 1).min(5)
    }
}

impl MockSession {
    fn login(&self, call: &ProcedureCall) -> Result<Vec<Recordset>, BackendError> {
        let username = call.text("Username").ok_or_else(|| missing(call, "Username"))?;
        let password = call.text("Password").ok_or_else(|| missing(call, "Password"))?;

        let rows = MOCK_USERS
            .iter()
            .filter(|u| u.active && u.username == username && u.password == Some(password))
            .map(|u| {
                Record::new()
                    .with("UserId", u.id)
                    .with("Username", u.username)
                    .with("Rol", u.role)
                    .with("LastLoginAt", Local::now().naive_local())
            })
            .collect();

        Ok(vec![rows])
    }

    async fn user_permission(&self, call: &ProcedureCall) -> Result<Vec<Recordset>, BackendError> {
        let user_id = call.int("UserId").ok_or_else(|| missing(call, "UserId"))?;
        let data = self.data.lock().await;
        let permission = data.permissions.get(&i64::from(user_id)).cloned();
        Ok(vec![vec![Record::new().with("Permission", permission)]])
    }

    async fn vendors_with_permissions(&self) -> Result<Vec<Recordset>, BackendError> {
        let data = self.data.lock().await;
        let rows = MOCK_USERS
            .iter()
            .filter(|u| u.role == "Vendedor")
            .map(|u| {
                let permission = data
                    .permissions
                    .get(&u.id)
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_PERMISSION.to_string());
                Record::new()
                    .with("UserId", u.id)
                    .with("Username", u.username)
                    .with("Rol", u.role)
                    .with("Permission", permission)
            })
            .collect();
        Ok(vec![rows])
    }

    async fn update_user_permission(&self, call: &ProcedureCall) -> Result<Vec<Recordset>, BackendError> {
        let user_id = i64::from(call.int("UserId").ok_or_else(|| missing(call, "UserId"))?);
        let permission = call
            .text("PermissionType")
            .ok_or_else(|| missing(call, "PermissionType"))?;

        if !MOCK_USERS.iter().any(|u| u.id == user_id) {
            return Err(BackendError::Procedure(format!("Usuario {user_id} no existe")));
        }

        self.data.lock().await.permissions.insert(user_id, permission.to_string());
        Ok(Vec::new())
    }

    async fn all_months_status(&self, call: &ProcedureCall) -> Result<Vec<Recordset>, BackendError> {
        let year = call.int("Year").ok_or_else(|| missing(call, "Year"))?;
        let data = self.data.lock().await;
        let rows = YearMonth::months_of_year(year)
            .map(|ym| {
                Record::new()
                    .with("YearMonth", ym.to_string())
                    .with("IsVisible", data.visible_months.contains(&ym))
            })
            .collect();
        Ok(vec![rows])
    }

    async fn update_month_visibility(&self, call: &ProcedureCall) -> Result<Vec<Recordset>, BackendError> {
        let year_month = year_month_param(call)?;
        let visible = call.bit("IsVisible").ok_or_else(|| missing(call, "IsVisible"))?;

        let mut data = self.data.lock().await;
        if visible {
            data.visible_months.insert(year_month);
        } else {
            data.visible_months.remove(&year_month);
        }
        Ok(Vec::new())
    }

    fn dashboard_metrics(&self, call: &ProcedureCall) -> Result<Vec<Recordset>, BackendError> {
        let year_month = year_month_param(call)?;

        let performance: Recordset = SALES_SAMPLE
            .iter()
            .map(|(name, _, weeks)| {
                let mut record = Record::new().with("Vendedor", *name);
                for (i, amount) in weeks.iter().enumerate() {
                    record.push(format!("S{}", i + 1), cents(*amount));
                }
                record.with("Total", cents(weeks.iter().sum()))
            })
            .collect();

        let monthly: i64 = SALES_SAMPLE.iter().flat_map(|(_, _, weeks)| weeks.iter()).sum();
        let average = cents(monthly) / Decimal::from(SALES_SAMPLE.len() as i64);

        Ok(vec![
            vec![Record::new().with("TotalMensualUSD", cents(monthly))],
            vec![Record::new().with("PromedioPorVendedorUSD", average)],
            vec![Record::new().with("WeekNo", current_week(year_month))],
            performance,
        ])
    }

    fn vendor_dashboard(&self, call: &ProcedureCall) -> Result<Vec<Recordset>, BackendError> {
        let user_id = i64::from(call.int("UserID").ok_or_else(|| missing(call, "UserID"))?);
        let year_month = year_month_param(call)?;

        let weeks = SALES_SAMPLE
            .iter()
            .find(|(_, owner, _)| *owner == Some(user_id))
            .map(|(_, _, weeks)| *weeks)
            .unwrap_or_default();

        let detail: Recordset = weeks
            .iter()
            .enumerate()
            .filter(|(_, amount)| **amount > 0)
            .map(|(i, amount)| {
                Record::new()
                    .with("WeekNo", (i + 1) as i64)
                    .with("TotalUSD", cents(*amount))
            })
            .collect();

        Ok(vec![
            vec![Record::new().with("TotalPersonalUSD", cents(weeks.iter().sum()))],
            vec![Record::new().with("WeekNo", current_week(year_month))],
            detail,
        ])
    }
}

#[async_trait]
impl BackendSession for MockSession {
    async fn call(&mut self, call: &ProcedureCall) -> Result<Vec<Recordset>, BackendError> {
        tracing::debug!("🧪 [mock] {}", call.name);
        match call.name {
            procedures::SP_LOGIN => self.login(call),
            procedures::SP_GET_USER_PERMISSION => self.user_permission(call).await,
            procedures::SP_GET_VENDORS_WITH_PERMISSIONS => self.vendors_with_permissions().await,
            procedures::SP_UPDATE_USER_PERMISSION => self.update_user_permission(call).await,
            procedures::SP_GET_ALL_MONTHS_STATUS => self.all_months_status(call).await,
            procedures::SP_UPDATE_MONTH_VISIBILITY => self.update_month_visibility(call).await,
            procedures::SP_GET_DASHBOARD_METRICS => self.dashboard_metrics(call),
            procedures::SP_GET_VENDOR_DASHBOARD => self.vendor_dashboard(call),
            other => Err(BackendError::UnknownProcedure(other.to_string())),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), BackendError> {
        self.open_sessions.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}
