// [libs/infra/object-store/src/lib.rs]
/*!
 * =================================================================
 * APARATO: OBJECT STORE WRITER (V4.1 - ADDITIVE DISCIPLINE)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: PUT/COPY/DELETE BAJO CLAVES CANÓNICAS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. ADDITIVE STORE: Desde la perspectiva del núcleo este almacén solo
 *    agrega y renombra. DELETE es alcanzable únicamente desde la ruta
 *    move-on-rename del fetcher de media.
 * 2. DRY-RUN SHIELD: Con DRY_RUN activo toda mutación se registra y se
 *    suprime, preservando el conteo para el log de auditoría.
 * =================================================================
 */

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::MetadataDirective;
use thiserror::Error;
use tracing::{debug, info};

/// Catálogo de fallos del almacén de objetos.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Fallo reportado por el SDK (red, permisos, clave inexistente).
    #[error("[L3_STORE_SDK_FAULT]: {0}")]
    Sdk(String),

    /// URL `s3://bucket/key` malformada.
    #[error("[L3_STORE_URL_FAULT]: UNPARSEABLE_S3_URL -> {0}")]
    BadUrl(String),
}

/// Referencia privada `s3://bucket/key`.
pub fn s3_url(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}

/// Referencia pública `https://bucket.s3.amazonaws.com/key`.
pub fn public_http_url(bucket: &str, key: &str) -> String {
    format!("https://{bucket}.s3.amazonaws.com/{key}")
}

/// Descompone una URL `s3://bucket/key` en sus partes.
pub fn parse_s3_url(url: &str) -> Result<(String, String), StoreError> {
    let rest = url.strip_prefix("s3://").ok_or_else(|| StoreError::BadUrl(url.to_string()))?;
    let (bucket, key) = rest.split_once('/').ok_or_else(|| StoreError::BadUrl(url.to_string()))?;
    if bucket.is_empty() || key.is_empty() {
        return Err(StoreError::BadUrl(url.to_string()));
    }
    Ok((bucket.to_string(), key.to_string()))
}

/// Cliente compartido del almacén; seguro para uso desde los workers.
#[derive(Clone)]
pub struct ObjectStoreWriter {
    sdk_client: aws_sdk_s3::Client,
    dry_run: bool,
}

impl ObjectStoreWriter {
    /// Construye el cliente con la cadena regional por defecto del entorno.
    pub async fn connect(aws_region: &str, dry_run: bool) -> Self {
        let shared_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(aws_region.to_string()))
            .load()
            .await;
        info!("🪣 [STORE]: Object store uplink ready (region={aws_region}, dry_run={dry_run})");
        Self { sdk_client: aws_sdk_s3::Client::new(&shared_config), dry_run }
    }

    /// Sube bytes bajo una clave canónica del namespace indicado.
    pub async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StoreError> {
        if self.dry_run {
            info!("🧪 [STORE/DRY]: PUT suppressed -> s3://{bucket}/{key}");
            return Ok(());
        }
        let mut request = self
            .sdk_client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(bytes));
        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }
        request.send().await.map_err(|fault| StoreError::Sdk(fault.to_string()))?;
        debug!("⬆️ [STORE]: PUT s3://{bucket}/{key}");
        Ok(())
    }

    /// Copia un objeto entre claves (misma o distinta bucket).
    pub async fn copy(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
        content_type: Option<&str>,
    ) -> Result<(), StoreError> {
        if self.dry_run {
            info!("🧪 [STORE/DRY]: COPY suppressed -> s3://{src_bucket}/{src_key} => s3://{dst_bucket}/{dst_key}");
            return Ok(());
        }
        let mut request = self
            .sdk_client
            .copy_object()
            .copy_source(format!("{src_bucket}/{src_key}"))
            .bucket(dst_bucket)
            .key(dst_key);
        if let Some(ct) = content_type {
            request = request.metadata_directive(MetadataDirective::Replace).content_type(ct);
        }
        request.send().await.map_err(|fault| StoreError::Sdk(fault.to_string()))?;
        debug!("📑 [STORE]: COPY s3://{src_bucket}/{src_key} => s3://{dst_bucket}/{dst_key}");
        Ok(())
    }

    /// Elimina una clave. Única ruta de borrado: move-on-rename.
    pub async fn delete(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        if self.dry_run {
            info!("🧪 [STORE/DRY]: DELETE suppressed -> s3://{bucket}/{key}");
            return Ok(());
        }
        self.sdk_client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|fault| StoreError::Sdk(fault.to_string()))?;
        debug!("🗑️ [STORE]: DELETE s3://{bucket}/{key}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certify_url_formatting_contracts() {
        assert_eq!(s3_url("sequoia-canonical", "media/a/b.jpg"), "s3://sequoia-canonical/media/a/b.jpg");
        assert_eq!(
            public_http_url("sequoia-public", "media/a/b_preview.jpg"),
            "https://sequoia-public.s3.amazonaws.com/media/a/b_preview.jpg"
        );
    }

    #[test]
    fn certify_s3_url_parsing() {
        let (bucket, key) = parse_s3_url("s3://sequoia-canonical/media/x/y.jpg").unwrap();
        assert_eq!(bucket, "sequoia-canonical");
        assert_eq!(key, "media/x/y.jpg");

        assert!(parse_s3_url("https://elsewhere/object").is_err());
        assert!(parse_s3_url("s3://only-bucket").is_err());
        assert!(parse_s3_url("s3://bucket/").is_err());
    }
}
