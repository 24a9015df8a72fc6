// [libs/infra/db/src/client.rs]
/*!
 * =================================================================
 * APARATO: DATABASE CONNECTION CLIENT (V4.8 - MEMORY ANCHORED)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: GESTIÓN DE ENLACES Y BOOTSTRAP DEL ESQUEMA
 *
 * # Mathematical Proof (In-Memory Consistency):
 * En modo RAM el cliente abre el ancla de persistencia ANTES del
 * bootstrap del esquema, garantizando que las tablas residan en un
 * segmento de memoria compartido visible para conexiones posteriores.
 * =================================================================
 */

use std::sync::Arc;

use libsql::{Builder, Connection, Database};
use tracing::{error, info};

use crate::errors::DbError;
use crate::schema::apply_archive_schema;

/// Cliente del archivo relacional; clonable y compartido por la corrida.
#[derive(Clone)]
pub struct SequoiaDbClient {
    database_driver: Arc<Database>,
    /// Mantiene viva la base en memoria evitando que SQLite la purgue.
    _memory_persistence_anchor: Option<Arc<Connection>>,
}

impl SequoiaDbClient {
    /// Abre el enlace (local, remoto o memoria) y aplica el esquema.
    pub async fn connect(database_url: &str, auth_token: Option<String>) -> Result<Self, DbError> {
        if database_url.is_empty() {
            return Err(DbError::ConfigurationError("DATABASE_URL_UNDEFINED".into()));
        }

        info!("🔌 [DATABASE]: Initiating archive link to [{database_url}]");

        let is_remote = database_url.starts_with("libsql://") || database_url.starts_with("https://");
        let is_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        let database_driver = if is_remote {
            let token = auth_token
                .ok_or_else(|| DbError::ConfigurationError("DATABASE_AUTH_TOKEN_MISSING".into()))?;
            Builder::new_remote(database_url.to_string(), token).build().await
        } else {
            Builder::new_local(database_url).build().await
        }
        .map_err(|fault| DbError::ConnectionError(format!("DRIVER_IGNITION_FAILURE: {fault}")))?;

        let shared_driver = Arc::new(database_driver);
        let mut anchor = None;

        if is_memory {
            let anchor_connection = shared_driver
                .connect()
                .map_err(|fault| DbError::ConnectionError(format!("ANCHOR_FAULT: {fault}")))?;
            apply_archive_schema(&anchor_connection).await?;
            anchor = Some(Arc::new(anchor_connection));
        } else {
            let bootstrap_connection = shared_driver
                .connect()
                .map_err(|fault| DbError::ConnectionError(format!("BOOTSTRAP_LINK_FAULT: {fault}")))?;
            apply_archive_schema(&bootstrap_connection).await?;
        }

        Ok(Self { database_driver: shared_driver, _memory_persistence_anchor: anchor })
    }

    /// Conexión fresca; los escritores abren una por transacción de voyage.
    pub fn connection(&self) -> Result<Connection, DbError> {
        self.database_driver.connect().map_err(|fault| {
            error!("⚠️ [DATABASE]: Connection allocation failed: {fault}");
            DbError::ConnectionError(fault.to_string())
        })
    }
}
