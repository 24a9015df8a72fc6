// [apps/ingest/src/config.rs]
/*!
 * =================================================================
 * APARATO: INGEST CONFIGURATION (V4.9 - FAIL BEFORE I/O)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L6)
 * RESPONSABILIDAD: DIRECTIVAS DE ENTORNO Y VALIDACIÓN PRE-VUELO
 *
 * # Logic:
 * Toda variable llega vía CLI o entorno (dotenvy ya cargó el .env).
 * Una directiva obligatoria ausente o una ruta de credenciales
 * inválida abortan ANTES de cualquier I/O remoto.
 * =================================================================
 */

use std::path::Path;

use anyhow::{bail, Result};
use clap::Parser;

use sequoia_infra_rpc::RpcPolicy;

/// Directivas de mando del reconciliador de voyages.
#[derive(Parser, Debug)]
#[command(
    author = "Sequoia Archive Engineering",
    version = "0.4.0",
    about = "Sequoia Voyage Ingest // Document-is-truth reconciler"
)]
pub struct IngestDirectives {
    /// Documento maestro a ingerir.
    #[arg(long, env = "DOC_ID")]
    pub doc_id: String,

    /// Planilla operativa de proyección.
    #[arg(long, env = "SPREADSHEET_ID")]
    pub spreadsheet_id: String,

    /// Corrida de ensayo: las podas y mutaciones de S3 se suprimen.
    #[arg(long, env = "DRY_RUN", default_value = "false")]
    pub dry_run: String,

    /// Título de la pestaña presidencial.
    #[arg(long, env = "PRESIDENTS_SHEET_TITLE", default_value = "presidents")]
    pub presidents_sheet_title: String,

    /// URL del archivo relacional (libsql://, https:// o ruta local).
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Token del archivo relacional remoto.
    #[arg(long, env = "DATABASE_AUTH_TOKEN")]
    pub database_auth_token: Option<String>,

    /// Región del almacén de objetos.
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub aws_region: String,

    /// Namespace privado de originales.
    #[arg(long, env = "S3_PRIVATE_BUCKET", default_value = "sequoia-canonical")]
    pub s3_private_bucket: String,

    /// Namespace público de derivados.
    #[arg(long, env = "S3_PUBLIC_BUCKET", default_value = "sequoia-public")]
    pub s3_public_bucket: String,

    /// Token opcional del API de Dropbox (sin él se fuerza dl=1).
    #[arg(long, env = "DROPBOX_ACCESS_TOKEN")]
    pub dropbox_access_token: Option<String>,

    /// Timeout de descargas Dropbox, en segundos.
    #[arg(long, env = "DROPBOX_TIMEOUT", default_value_t = 60)]
    pub dropbox_timeout: u64,

    /// Presupuesto de reintentos del arnés RPC.
    #[arg(long, env = "GAPI_MAX_RETRIES", default_value_t = 10)]
    pub gapi_max_retries: u32,

    /// Base del backoff exponencial, en segundos.
    #[arg(long, env = "GAPI_BACKOFF_BASE", default_value_t = 0.8)]
    pub gapi_backoff_base: f64,

    /// Techo del backoff, en segundos.
    #[arg(long, env = "GAPI_BACKOFF_MAX", default_value_t = 30.0)]
    pub gapi_backoff_max: f64,

    /// Intervalo mínimo entre llamadas a Sheets, en segundos.
    #[arg(long, env = "SHEETS_RATE_LIMIT_SECONDS", default_value_t = 0.0)]
    pub sheets_rate_limit_seconds: f64,

    /// Ruta del archivo de identidad cloud; se valida su existencia.
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    pub google_credentials_path: String,

    /// Bearer token ya emitido para Docs/Sheets/Drive.
    #[arg(long, env = "GOOGLE_API_ACCESS_TOKEN")]
    pub google_api_access_token: String,

    /// Workers del pool de hidratación de media.
    #[arg(long, env = "MEDIA_WORKERS", default_value_t = 4)]
    pub media_workers: usize,
}

/// Configuración validada de la corrida.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub doc_id: String,
    pub spreadsheet_id: String,
    pub dry_run: bool,
    pub presidents_sheet_title: String,
    pub database_url: String,
    pub database_auth_token: Option<String>,
    pub aws_region: String,
    pub s3_private_bucket: String,
    pub s3_public_bucket: String,
    pub dropbox_access_token: Option<String>,
    pub dropbox_timeout: u64,
    pub rpc_policy: RpcPolicy,
    pub google_api_access_token: String,
    pub media_workers: usize,
}

/// Interpretación flexible de banderas booleanas del entorno.
pub fn parse_env_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "y" | "on")
}

impl IngestDirectives {
    /// Valida las directivas y cristaliza la configuración de la corrida.
    ///
    /// # Errors:
    /// Aborta si `DOC_ID`/`SPREADSHEET_ID` llegan vacíos o si la ruta de
    /// credenciales no existe en el sistema de archivos.
    pub fn into_config(self) -> Result<IngestConfig> {
        if self.doc_id.trim().is_empty() || self.spreadsheet_id.trim().is_empty() {
            bail!("CONFIG_FAULT: DOC_ID and SPREADSHEET_ID are required");
        }
        let credentials = self.google_credentials_path.trim();
        if credentials.is_empty() || !Path::new(credentials).exists() {
            bail!("CONFIG_FAULT: GOOGLE_APPLICATION_CREDENTIALS not set or invalid path");
        }

        let presidents_sheet_title = {
            let trimmed = self.presidents_sheet_title.trim();
            if trimmed.is_empty() { "presidents".to_string() } else { trimmed.to_string() }
        };

        Ok(IngestConfig {
            doc_id: self.doc_id.trim().to_string(),
            spreadsheet_id: self.spreadsheet_id.trim().to_string(),
            dry_run: parse_env_flag(&self.dry_run),
            presidents_sheet_title,
            database_url: self.database_url.trim().to_string(),
            database_auth_token: self.database_auth_token,
            aws_region: self.aws_region,
            s3_private_bucket: self.s3_private_bucket,
            s3_public_bucket: self.s3_public_bucket,
            dropbox_access_token: self.dropbox_access_token.filter(|t| !t.trim().is_empty()),
            dropbox_timeout: self.dropbox_timeout,
            rpc_policy: RpcPolicy {
                max_retries: self.gapi_max_retries,
                backoff_base_seconds: self.gapi_backoff_base,
                backoff_max_seconds: self.gapi_backoff_max,
                rate_limit_seconds: self.sheets_rate_limit_seconds,
            },
            google_api_access_token: self.google_api_access_token,
            media_workers: self.media_workers.max(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certify_env_flag_interpretation() {
        for truthy in ["1", "true", "TRUE", "yes", "Y", "on"] {
            assert!(parse_env_flag(truthy), "{truthy} debe ser verdadero");
        }
        for falsy in ["", "0", "false", "no", "off", "anything"] {
            assert!(!parse_env_flag(falsy), "{falsy} debe ser falso");
        }
    }
}
