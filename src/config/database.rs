// src/config/database.rs

use std::{fmt, time::Duration};

use tiberius::{AuthMethod, EncryptionLevel};

use crate::{common::error::BackendError, config::ConfigError};

const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, PartialEq, Eq)]
pub enum DbAuth {
    // Autenticação do SQL Server (DB_USER + DB_PASSWORD)
    SqlServer { user: String, password: String },
    // Autenticação integrada do Windows (driver nativo / conexão confiável)
    Integrated,
}

#[derive(Clone, PartialEq, Eq)]
pub enum ConnectionSource {
    ConnectionString(String),
    Discrete {
        host: String,
        port: Option<u16>,
        instance: Option<String>,
        database: Option<String>,
        auth: DbAuth,
    },
}

// Configuração do SQL Server, montada uma única vez na inicialização.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub source: ConnectionSource,
    pub trust_cert: bool,
    pub encrypt: bool,
    pub query_timeout: Duration,
}

fn flag(value: Option<String>, default: bool) -> bool {
    match value.map(|v| v.trim().to_lowercase()) {
        Some(v) if ["true", "1", "yes", "si", "sí"].contains(&v.as_str()) => true,
        Some(v) if ["false", "0", "no"].contains(&v.as_str()) => false,
        _ => default,
    }
}

// "host", "host,porta" ou "host\instância"
fn split_server(raw: &str) -> Result<(String, Option<u16>, Option<String>), ConfigError> {
    if let Some((host, port)) = raw.split_once(',') {
        let port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: "DB_SERVER".into(),
            value: raw.into(),
        })?;
        return Ok((host.trim().to_string(), Some(port), None));
    }
    if let Some((host, instance)) = raw.split_once('\\') {
        return Ok((host.trim().to_string(), None, Some(instance.trim().to_string())));
    }
    Ok((raw.trim().to_string(), None, None))
}

impl DatabaseConfig {
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let source = match non_empty("SQLSERVER_CONN_STRING") {
            Some(conn) => ConnectionSource::ConnectionString(conn),
            None => {
                let native_driver = non_empty("SQLSERVER_DRIVER")
                    .map(|d| matches!(d.to_lowercase().as_str(), "msnodesqlv8" | "native" | "integrated"))
                    .unwrap_or(false);

                let auth = match (native_driver, non_empty("DB_USER"), non_empty("DB_PASSWORD")) {
                    (false, Some(user), Some(password)) => DbAuth::SqlServer { user, password },
                    _ => DbAuth::Integrated,
                };

                let server = non_empty("DB_SERVER").unwrap_or_else(|| "localhost".to_string());
                let (host, port, instance) = split_server(&server)?;

                ConnectionSource::Discrete {
                    host,
                    port,
                    instance,
                    database: non_empty("DB_DATABASE"),
                    auth,
                }
            }
        };

        let query_timeout = match non_empty("DB_QUERY_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "DB_QUERY_TIMEOUT_SECS".into(),
                value: raw.clone(),
            })?,
            None => DEFAULT_QUERY_TIMEOUT_SECS,
        };

        Ok(Self {
            source,
            trust_cert: flag(lookup("DB_TRUST_CERT"), true),
            encrypt: flag(lookup("DB_ENCRYPT"), false),
            query_timeout: Duration::from_secs(query_timeout),
        })
    }

    /// Instância nomeada sem porta explícita: a porta TCP vem do SQL Browser.
    pub fn named_instance(&self) -> Option<String> {
        match &self.source {
            ConnectionSource::Discrete { port: None, instance, .. } => instance.clone(),
            ConnectionSource::Discrete { .. } => None,
            ConnectionSource::ConnectionString(conn) => conn
                .split(';')
                .filter_map(|pair| pair.split_once('='))
                .find(|(key, _)| {
                    matches!(
                        key.trim().to_lowercase().as_str(),
                        "server" | "data source" | "address" | "addr" | "network address"
                    )
                })
                .and_then(|(_, server)| {
                    let server = server.trim();
                    let server = server.strip_prefix("tcp:").unwrap_or(server);
                    if server.contains(',') {
                        return None;
                    }
                    server
                        .split_once('\\')
                        .map(|(_, instance)| instance.trim().to_string())
                        .filter(|instance| !instance.is_empty())
                }),
        }
    }

    /// Converte para a configuração do tiberius.
    pub fn to_tiberius(&self) -> Result<tiberius::Config, BackendError> {
        match &self.source {
            // A string de conexão manda: criptografia e certificado vêm dela.
            ConnectionSource::ConnectionString(conn) => Ok(tiberius::Config::from_ado_string(conn)?),
            ConnectionSource::Discrete { host, port, instance, database, auth } => {
                let mut config = tiberius::Config::new();
                config.host(host);
                if let Some(port) = port {
                    config.port(*port);
                }
                if let Some(instance) = instance {
                    config.instance_name(instance);
                }
                if let Some(database) = database {
                    config.database(database);
                }
                config.authentication(auth_method(auth)?);
                if self.trust_cert {
                    config.trust_cert();
                }
                config.encryption(if self.encrypt {
                    EncryptionLevel::Required
                } else {
                    EncryptionLevel::Off
                });
                Ok(config)
            }
        }
    }
}

#[cfg(windows)]
fn auth_method(auth: &DbAuth) -> Result<AuthMethod, BackendError> {
    Ok(match auth {
        DbAuth::SqlServer { user, password } => AuthMethod::sql_server(user, password),
        DbAuth::Integrated => AuthMethod::Integrated,
    })
}

#[cfg(not(windows))]
fn auth_method(auth: &DbAuth) -> Result<AuthMethod, BackendError> {
    match auth {
        DbAuth::SqlServer { user, password } => Ok(AuthMethod::sql_server(user, password)),
        DbAuth::Integrated => Err(BackendError::Config(
            "la autenticación integrada de Windows no está disponible en esta plataforma; defina DB_USER y DB_PASSWORD"
                .into(),
        )),
    }
}

// Nunca imprime a senha.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            ConnectionSource::ConnectionString(_) => f
                .debug_struct("DatabaseConfig")
                .field("connection_string", &"***")
                .field("query_timeout", &self.query_timeout)
                .finish(),
            ConnectionSource::Discrete { host, port, instance, database, auth } => f
                .debug_struct("DatabaseConfig")
                .field("server", host)
                .field("port", port)
                .field("instance", instance)
                .field("database", database)
                .field(
                    "auth",
                    &match auth {
                        DbAuth::SqlServer { user, .. } => format!("sql_server(user={user}, password=***)"),
                        DbAuth::Integrated => "integrated".to_string(),
                    },
                )
                .field("trust_cert", &self.trust_cert)
                .field("encrypt", &self.encrypt)
                .field("query_timeout", &self.query_timeout)
                .finish(),
        }
    }
}
