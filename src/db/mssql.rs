// src/db/mssql.rs

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use tiberius::{Client, ColumnData, FromSql, Query, Row, SqlBrowser};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use crate::{
    common::error::BackendError,
    config::DatabaseConfig,
    db::{
        backend::{BackendKind, BackendSession, SalesBackend},
        procedures::{self, ParamValue, ProcedureCall},
        value::{Record, Recordset, SqlValue},
    },
};

type TdsClient = Client<Compat<TcpStream>>;

// Backend SQL Server: cada sessão é uma conexão TCP própria.
#[derive(Clone)]
pub struct MssqlBackend {
    config: tiberius::Config,
    named_instance: Option<String>,
    timeout: Duration,
}

impl MssqlBackend {
    pub fn new(db: &DatabaseConfig) -> Result<Self, BackendError> {
        Ok(Self {
            config: db.to_tiberius()?,
            named_instance: db.named_instance(),
            timeout: db.query_timeout,
        })
    }

    /// `true` quando a porta da instância é descoberta pelo SQL Browser (UDP 1434).
    pub fn uses_sql_browser(&self) -> bool {
        self.named_instance.is_some()
    }

    async fn connect(&self) -> Result<TdsClient, BackendError> {
        let tcp = match &self.named_instance {
            Some(instance) => {
                tracing::info!("🔌 Conectando à instância {} via SQL Browser em {}...", instance, self.config.get_addr());
                TcpStream::connect_named(&self.config).await?
            }
            None => {
                tracing::info!("🔌 Conectando ao SQL Server em {}...", self.config.get_addr());
                TcpStream::connect(self.config.get_addr()).await?
            }
        };
        tcp.set_nodelay(true)?;

        let client = match Client::connect(self.config.clone(), tcp.compat_write()).await {
            Ok(client) => client,
            // Azure/cluster pode redirecionar para outro nó
            Err(tiberius::error::Error::Routing { host, port }) => {
                let mut config = self.config.clone();
                config.host(&host);
                config.port(port);
                tracing::info!("↪️ Redirecionado para {}:{}", host, port);

                // O redirecionamento traz host e porta; o Browser não entra aqui.
                let tcp = TcpStream::connect(config.get_addr()).await?;
                tcp.set_nodelay(true)?;
                Client::connect(config, tcp.compat_write()).await?
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!("✅ Conexão estabelecida");
        Ok(client)
    }

    /// Diagnóstico usado pelo binário `check_connection`.
    pub async fn diagnostics(&self) -> Result<ServerDiagnostics, BackendError> {
        let mut session = MssqlSession { client: self.open_client().await?, timeout: self.timeout };
        let outcome = session.diagnostics().await;
        if let Err(e) = session.client.close().await {
            tracing::warn!("⚠️ Falha ao fechar a conexão: {}", e);
        }
        outcome
    }

    async fn open_client(&self) -> Result<TdsClient, BackendError> {
        tokio::time::timeout(self.timeout, self.connect())
            .await
            .map_err(|_| BackendError::Timeout {
                operation: "conexión".into(),
                seconds: self.timeout.as_secs(),
            })?
    }
}

#[async_trait]
impl SalesBackend for MssqlBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Mssql
    }

    async fn open(&self) -> Result<Box<dyn BackendSession>, BackendError> {
        let client = self.open_client().await?;
        Ok(Box::new(MssqlSession { client, timeout: self.timeout }))
    }
}

struct MssqlSession {
    client: TdsClient,
    timeout: Duration,
}

impl MssqlSession {
    async fn run(&mut self, sql: String, params: &[ParamValue], operation: &str) -> Result<Vec<Recordset>, BackendError> {
        let mut query = Query::new(sql);
        for param in params {
            match param {
                ParamValue::NVarChar(v) | ParamValue::Char(v) => query.bind(v.clone()),
                ParamValue::Int(v) => query.bind(*v),
                ParamValue::Bit(v) => query.bind(*v),
            }
        }

        let client = &mut self.client;
        let results = tokio::time::timeout(self.timeout, async move {
            query.query(client).await?.into_results().await
        })
        .await
        .map_err(|_| BackendError::Timeout {
            operation: operation.to_string(),
            seconds: self.timeout.as_secs(),
        })??;

        results
            .iter()
            .map(|rows| rows.iter().map(record_from_row).collect::<Result<Recordset, _>>())
            .collect()
    }

    async fn diagnostics(&mut self) -> Result<ServerDiagnostics, BackendError> {
        let info = self
            .run("SELECT DB_NAME() AS DatabaseName, @@VERSION AS SQLVersion".into(), &[], "diagnóstico")
            .await?;
        let info = info.first().and_then(|rows| rows.first()).cloned().unwrap_or_default();

        let tables = self
            .run(
                "SELECT s.name AS SchemaName, t.name AS TableName \
                 FROM sys.tables t JOIN sys.schemas s ON t.schema_id = s.schema_id \
                 WHERE s.name IN ('auth', 'ventas') ORDER BY s.name, t.name"
                    .into(),
                &[],
                "diagnóstico",
            )
            .await?;

        let found = self
            .run(
                "SELECT s.name + '.' + p.name AS ProcName \
                 FROM sys.procedures p JOIN sys.schemas s ON p.schema_id = s.schema_id \
                 WHERE s.name IN ('auth', 'ventas')"
                    .into(),
                &[],
                "diagnóstico",
            )
            .await?;
        let found: Vec<String> = found
            .iter()
            .flatten()
            .filter_map(|r| r.text("ProcName"))
            .collect();

        Ok(ServerDiagnostics {
            database: info.text("DatabaseName").unwrap_or_default(),
            version: info
                .text("SQLVersion")
                .and_then(|v| v.lines().next().map(str::to_string))
                .unwrap_or_default(),
            tables: tables
                .iter()
                .flatten()
                .filter_map(|r| Some(format!("{}.{}", r.text("SchemaName")?, r.text("TableName")?)))
                .collect(),
            missing_procedures: procedures::ALL
                .iter()
                .filter(|name| !found.iter().any(|f| f.eq_ignore_ascii_case(name)))
                .map(|name| name.to_string())
                .collect(),
        })
    }
}

#[async_trait]
impl BackendSession for MssqlSession {
    async fn call(&mut self, call: &ProcedureCall) -> Result<Vec<Recordset>, BackendError> {
        tracing::debug!("📝 {}", call.to_sql());
        let params: Vec<ParamValue> = call.params.iter().map(|p| p.value.clone()).collect();
        self.run(call.to_sql(), &params, call.name).await
    }

    async fn close(self: Box<Self>) -> Result<(), BackendError> {
        self.client.close().await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServerDiagnostics {
    pub database: String,
    pub version: String,
    pub tables: Vec<String>,
    pub missing_procedures: Vec<String>,
}

fn record_from_row(row: &Row) -> Result<Record, BackendError> {
    let mut record = Record::new();
    for (column, data) in row.cells() {
        record.push(column.name(), column_value(data)?);
    }
    Ok(record)
}

// Converte o valor TDS no valor neutro; MONEY chega como F64, DECIMAL como Numeric.
fn column_value(data: &ColumnData<'static>) -> Result<SqlValue, BackendError> {
    let value = match data {
        ColumnData::U8(v) => v.map(|v| SqlValue::Int(v.into())),
        ColumnData::I16(v) => v.map(|v| SqlValue::Int(v.into())),
        ColumnData::I32(v) => v.map(|v| SqlValue::Int(v.into())),
        ColumnData::I64(v) => v.map(SqlValue::Int),
        ColumnData::F32(v) => v.map(|v| SqlValue::Float(v.into())),
        ColumnData::F64(v) => v.map(SqlValue::Float),
        ColumnData::Bit(v) => v.map(SqlValue::Bool),
        ColumnData::String(v) => v.as_ref().map(|s| SqlValue::Text(s.to_string())),
        ColumnData::Guid(v) => v.map(|g| SqlValue::Text(g.to_string())),
        ColumnData::Numeric(_) => Decimal::from_sql(data)?.map(SqlValue::Decimal),
        ColumnData::DateTime(_) | ColumnData::SmallDateTime(_) | ColumnData::DateTime2(_) => {
            NaiveDateTime::from_sql(data)?.map(SqlValue::DateTime)
        }
        ColumnData::Date(_) => NaiveDate::from_sql(data)?.map(SqlValue::Date),
        ColumnData::Time(_) => NaiveTime::from_sql(data)?.map(SqlValue::Time),
        ColumnData::DateTimeOffset(_) => {
            DateTime::<FixedOffset>::from_sql(data)?.map(SqlValue::DateTimeOffset)
        }
        #[allow(unreachable_patterns)]
        _ => None,
    };

    Ok(value.unwrap_or(SqlValue::Null))
}
