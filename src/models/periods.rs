// src/models/periods.rs

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

use chrono::{Datelike, Local, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

const MONTH_NAMES: [&str; 12] = [
    "ENERO", "FEBRERO", "MARZO", "ABRIL", "MAYO", "JUNIO",
    "JULIO", "AGOSTO", "SEPTIEMBRE", "OCTUBRE", "NOVIEMBRE", "DICIEMBRE",
];

// Período de relatório no formato "YYYY-MM".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' no es un mes válido (YYYY-MM)")]
pub struct InvalidYearMonth(pub String);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        ((1..=12).contains(&month) && (0..=9999).contains(&year)).then_some(Self { year, month })
    }

    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// Mês corrente em UTC; semeia e recompõe o estado de períodos.
    pub fn current_utc() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    /// Lê `?month=`; valores ausentes ou fora do formato caem no mês corrente.
    pub fn parse_or_current(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse().ok())
            .unwrap_or_else(Self::current)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Nome do mês em espanhol, em maiúsculas ("NOVIEMBRE").
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    pub fn months_of_year(year: i32) -> impl Iterator<Item = YearMonth> {
        (1..=12).filter_map(move |month| YearMonth::new(year, month))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = InvalidYearMonth;

    // Exatamente \d{4}-\d{2}, com mês entre 01 e 12.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidYearMonth(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        let digits_ok = bytes[..4].iter().chain(&bytes[5..]).all(u8::is_ascii_digit);
        if !digits_ok {
            return Err(invalid());
        }
        let year = s[..4].parse().map_err(|_| invalid())?;
        let month = s[5..].parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// Semana configurada pelo administrador dentro de um mês.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeekDescriptor {
    #[schema(example = "S1")]
    pub name: String,

    #[schema(example = "2025-11-01")]
    pub from: NaiveDate,

    #[schema(example = "2025-11-07")]
    pub to: NaiveDate,
}

// Estado em memória dos períodos: meses liberados, mês padrão e semanas por mês.
// Invariantes: `allowed` nunca fica vazio e `default` sempre pertence a `allowed`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PeriodState {
    #[schema(value_type = Vec<String>, example = json!(["2025-10", "2025-11"]))]
    pub allowed: BTreeSet<YearMonth>,

    #[schema(value_type = String, example = "2025-11")]
    pub default: YearMonth,

    #[schema(value_type = Object)]
    pub weeks: BTreeMap<YearMonth, Vec<WeekDescriptor>>,
}

impl PeriodState {
    pub fn new(current: YearMonth) -> Self {
        Self {
            allowed: BTreeSet::from([current]),
            default: current,
            weeks: BTreeMap::new(),
        }
    }

    /// Aplica um `POST /api/periods` e reestabelece as invariantes.
    pub fn apply(&mut self, update: PeriodsUpdatePayload, current: YearMonth) {
        if let Some(allowed) = update.allowed {
            self.allowed = allowed.into_iter().collect();
        }
        if let Some(default) = update.default {
            self.default = default;
        }
        self.normalize(current);
    }

    pub fn set_weeks(&mut self, year_month: YearMonth, weeks: Vec<WeekDescriptor>) {
        self.weeks.insert(year_month, weeks);
    }

    pub fn normalize(&mut self, current: YearMonth) {
        if self.allowed.is_empty() {
            self.allowed.insert(current);
        }
        if !self.allowed.contains(&self.default) {
            self.default = if self.allowed.contains(&current) {
                current
            } else {
                // `allowed` não está vazio aqui
                *self.allowed.iter().next().unwrap_or(&current)
            };
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct PeriodsUpdatePayload {
    #[schema(value_type = Option<Vec<String>>, example = json!(["2025-10", "2025-11"]))]
    pub allowed: Option<Vec<YearMonth>>,

    #[schema(value_type = Option<String>, example = "2025-11")]
    pub default: Option<YearMonth>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PeriodsUpdateResponse {
    pub ok: bool,
    pub state: PeriodState,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct WeeksPayload {
    pub weeks: Option<Vec<WeekDescriptor>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(raw: &str) -> YearMonth {
        raw.parse().unwrap()
    }

    #[test]
    fn parses_and_formats_year_months() {
        assert_eq!(ym("2025-11").to_string(), "2025-11");
        assert_eq!(ym("2025-11").month_name(), "NOVIEMBRE");
        for bad in ["2025-13", "2025-00", "2025-1", "25-11", "2025/11", "2025-1a", "", "2025-11-01"] {
            assert!(bad.parse::<YearMonth>().is_err(), "{bad} deveria falhar");
        }
    }

    #[test]
    fn malformed_month_query_falls_back_to_current() {
        assert_eq!(YearMonth::parse_or_current(Some("ayer")), YearMonth::current());
        assert_eq!(YearMonth::parse_or_current(None), YearMonth::current());
        assert_eq!(YearMonth::parse_or_current(Some("2024-02")), ym("2024-02"));
    }

    #[test]
    fn emptying_allowed_reinserts_current_month() {
        let current = ym("2025-11");
        let mut state = PeriodState::new(current);
        state.apply(PeriodsUpdatePayload { allowed: Some(vec![]), default: None }, current);

        assert_eq!(state.allowed, BTreeSet::from([current]));
        assert_eq!(state.default, current);
    }

    #[test]
    fn default_outside_allowed_is_replaced() {
        let current = ym("2025-11");
        let mut state = PeriodState::new(current);
        state.apply(
            PeriodsUpdatePayload {
                allowed: Some(vec![ym("2025-09"), ym("2025-10")]),
                default: Some(ym("2025-12")),
            },
            current,
        );

        assert_eq!(state.default, ym("2025-09"));
        assert!(state.allowed.contains(&state.default));
    }

    #[test]
    fn invariants_hold_after_many_toggles() {
        let current = ym("2025-06");
        let months: Vec<YearMonth> = YearMonth::months_of_year(2025).collect();
        let mut state = PeriodState::new(current);

        // gerador linear congruente simples: sequência determinística de toggles
        let mut seed: u64 = 0x5eed;
        for _ in 0..500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let target = months[(seed >> 33) as usize % months.len()];
            let mut allowed: Vec<YearMonth> = state.allowed.iter().copied().collect();
            if let Some(pos) = allowed.iter().position(|m| *m == target) {
                allowed.remove(pos);
            } else {
                allowed.push(target);
            }
            let default = ((seed >> 20) % 3 == 0).then_some(target);
            state.apply(PeriodsUpdatePayload { allowed: Some(allowed), default }, current);

            assert!(!state.allowed.is_empty());
            assert!(state.allowed.contains(&state.default));
        }
    }

    #[test]
    fn serializes_weeks_under_year_month_keys() {
        let current = ym("2025-11");
        let mut state = PeriodState::new(current);
        state.set_weeks(
            current,
            vec![WeekDescriptor {
                name: "S1".into(),
                from: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
                to: NaiveDate::from_ymd_opt(2025, 11, 7).unwrap(),
            }],
        );

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["allowed"], serde_json::json!(["2025-11"]));
        assert_eq!(json["default"], "2025-11");
        assert_eq!(json["weeks"]["2025-11"][0]["from"], "2025-11-01");
    }
}
