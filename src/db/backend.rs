// src/db/backend.rs

use async_trait::async_trait;

use crate::{
    common::error::BackendError,
    db::{procedures::ProcedureCall, value::Recordset},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Mssql,
    Mock,
}

impl BackendKind {
    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::Mssql => "SQL Server",
            BackendKind::Mock => "mock em memória",
        }
    }
}

// Capacidade de acesso ao banco, escolhida uma vez na inicialização.
#[async_trait]
pub trait SalesBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Abre uma sessão (uma conexão). Quem abre é responsável por chamar `close`.
    async fn open(&self) -> Result<Box<dyn BackendSession>, BackendError>;
}

#[async_trait]
pub trait BackendSession: Send {
    /// Executa um stored procedure e devolve todos os recordsets, na ordem.
    async fn call(&mut self, call: &ProcedureCall) -> Result<Vec<Recordset>, BackendError>;

    async fn close(self: Box<Self>) -> Result<(), BackendError>;
}

/// Fecha a sessão sem mascarar o resultado da operação que a usou.
pub async fn release(session: Box<dyn BackendSession>) {
    match session.close().await {
        Ok(()) => tracing::debug!("🔒 Conexão fechada"),
        Err(e) => tracing::warn!("⚠️ Falha ao fechar a conexão: {}", e),
    }
}

/// Sessão de uma chamada só: abre, executa e fecha em todos os caminhos.
pub async fn call_once(
    backend: &dyn SalesBackend,
    call: &ProcedureCall,
) -> Result<Vec<Recordset>, BackendError> {
    let mut session = backend.open().await?;
    let outcome = session.call(call).await;
    release(session).await;
    outcome
}
