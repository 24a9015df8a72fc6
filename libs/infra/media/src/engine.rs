// [libs/infra/media/src/engine.rs]
/*!
 * =================================================================
 * APARATO: MEDIA HYDRATION ENGINE (V4.7 - BOUNDED FAN-OUT)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: PIPELINE POR ÍTEM: MOVE / DOWNLOAD / PUT / DERIVADOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. IDEMPOTENT STEADY-STATE: Un enlace ya almacenado bajo su clave
 *    canónica no se re-descarga ni re-sube; la corrida sin cambios no
 *    emite PUT alguno.
 * 2. MOVE-ON-RENAME: La clave canónica recalculada distinta de la
 *    almacenada dispara COPY+DELETE del original y de sus derivados.
 * 3. CPU ISOLATION: El forjado de derivados corre en spawn_blocking.
 * =================================================================
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use serde_json::Value;
use tracing::{info, warn};

use sequoia_domain_models::{MediaItem, MediaLinkSet, MediaType, MediaUploadOutcome};
use sequoia_infra_object_store::{public_http_url, parse_s3_url, s3_url, ObjectStoreWriter};
use sequoia_infra_rpc::{RpcError, RpcHarness};

use crate::derivatives::make_image_derivatives;
use crate::detect::guess_extension;
use crate::errors::MediaError;
use crate::keys::{
    derivative_key, derivative_keys_from_original, extension_of_key, original_key, DerivativeKind,
};
use crate::links::{classify_link, extension_from_disposition, force_dropbox_download, SourceLink};

const DRIVE_FILES_ENDPOINT: &str = "https://www.googleapis.com/drive/v3/files";
const DROPBOX_SHARED_LINK_ENDPOINT: &str = "https://content.dropboxapi.com/2/sharing/get_shared_link_file";

/// Fila preexistente del índice de enlaces (pestaña media de la planilla).
#[derive(Debug, Clone, Default)]
pub struct LinkIndexEntry {
    pub s3_url: String,
    pub media_type: String,
    pub credit: String,
    pub media_slug: String,
    pub voyage_slug: String,
}

/// Parámetros del motor de hidratación.
#[derive(Debug, Clone)]
pub struct MediaEngineConfig {
    pub private_bucket: String,
    pub public_bucket: String,
    pub google_access_token: String,
    pub dropbox_access_token: Option<String>,
    pub dropbox_timeout_seconds: u64,
    /// Pool pequeño de workers de hidratación (default 4).
    pub worker_count: usize,
}

/// Resultado de un voyage completo: mapa por slug + contadores de movimiento.
#[derive(Debug, Default)]
pub struct VoyageMediaReport {
    pub links: MediaLinkSet,
    pub warnings: Vec<String>,
    /// Objetos retirados del almacén por move-on-rename.
    pub s3_deleted: usize,
}

struct ItemOutcome {
    index: usize,
    media_slug: String,
    outcome: Option<MediaUploadOutcome>,
    resolved_media_type: Option<String>,
    warnings: Vec<String>,
    s3_deleted: usize,
}

/// Motor de hidratación de media; compartido por la corrida.
pub struct MediaEngine {
    http_client: reqwest::Client,
    harness: Arc<RpcHarness>,
    store: ObjectStoreWriter,
    config: MediaEngineConfig,
}

impl MediaEngine {
    pub fn new(harness: Arc<RpcHarness>, store: ObjectStoreWriter, config: MediaEngineConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent("Sequoia-Voyage-Ingest/0.4")
            .timeout(Duration::from_secs(120))
            .build()
            .expect("FATAL: HTTP client initialization failed.");
        Self { http_client, harness, store, config }
    }

    // ------- Descargas -------

    async fn fetch_bytes(&self, label: &str, request: reqwest::RequestBuilder) -> Result<(Vec<u8>, String, Option<String>), RpcError> {
        self.harness
            .execute(label, || async {
                let request = request
                    .try_clone()
                    .ok_or_else(|| RpcError::Transport("UNCLONEABLE_REQUEST".to_string()))?;
                let response = request
                    .send()
                    .await
                    .map_err(|fault| RpcError::Transport(fault.to_string()))?;
                let status = response.status();
                if !status.is_success() {
                    let retry_after_seconds = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok());
                    let message = response.text().await.unwrap_or_default();
                    return Err(RpcError::Status {
                        code: status.as_u16(),
                        message: message.chars().take(300).collect(),
                        retry_after_seconds,
                    });
                }
                let content_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let extension_hint = response
                    .headers()
                    .get(reqwest::header::CONTENT_DISPOSITION)
                    .and_then(|v| v.to_str().ok())
                    .and_then(extension_from_disposition);
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|fault| RpcError::Transport(fault.to_string()))?;
                Ok((bytes.to_vec(), content_type, extension_hint))
            })
            .await
    }

    /// Drive: metadatos (nombre + mime) y luego el binario.
    async fn download_drive(&self, file_id: &str) -> Result<(Vec<u8>, String, Option<String>), MediaError> {
        let metadata_url = format!("{DRIVE_FILES_ENDPOINT}/{file_id}?fields=id,name,mimeType");
        let metadata: Value = self
            .harness
            .execute("drive.files.get(metadata)", || async {
                let response = self
                    .http_client
                    .get(&metadata_url)
                    .bearer_auth(&self.config.google_access_token)
                    .send()
                    .await
                    .map_err(|fault| RpcError::Transport(fault.to_string()))?;
                let status = response.status();
                if !status.is_success() {
                    let message = response.text().await.unwrap_or_default();
                    return Err(RpcError::Status {
                        code: status.as_u16(),
                        message: message.chars().take(300).collect(),
                        retry_after_seconds: None,
                    });
                }
                response.json::<Value>().await.map_err(|fault| RpcError::Payload(fault.to_string()))
            })
            .await?;

        let declared_mime = metadata.get("mimeType").and_then(Value::as_str).unwrap_or_default().to_string();
        let filename = metadata.get("name").and_then(Value::as_str).map(str::to_string);

        let download_request = self
            .http_client
            .get(format!("{DRIVE_FILES_ENDPOINT}/{file_id}?alt=media"))
            .bearer_auth(&self.config.google_access_token);
        let (bytes, transport_mime, _) = self.fetch_bytes("drive.files.get(media)", download_request).await?;

        let mime = if declared_mime.is_empty() { transport_mime } else { declared_mime };
        Ok((bytes, mime, filename))
    }

    /// Dropbox: API con token cuando existe; sin token, enlace `dl=1`.
    async fn download_dropbox(&self, shared_url: &str) -> Result<(Vec<u8>, String, Option<String>), MediaError> {
        let timeout = Duration::from_secs(self.config.dropbox_timeout_seconds);
        let (bytes, content_type, extension_hint) = match &self.config.dropbox_access_token {
            Some(token) => {
                let request = self
                    .http_client
                    .post(DROPBOX_SHARED_LINK_ENDPOINT)
                    .bearer_auth(token)
                    .header("Dropbox-API-Arg", format!(r#"{{"url": "{shared_url}"}}"#))
                    .timeout(timeout);
                self.fetch_bytes("dropbox.get_shared_link_file", request).await?
            }
            None => {
                let direct_url = force_dropbox_download(shared_url);
                let request = self.http_client.get(direct_url).timeout(timeout);
                self.fetch_bytes("dropbox.direct_download", request).await?
            }
        };
        Ok((bytes, content_type, extension_hint))
    }

    // ------- Protocolo move-on-rename -------

    /// Intenta el movimiento de un objeto ya almacenado para el mismo enlace.
    ///
    /// Retorna `Some(outcome)` cuando el ítem quedó resuelto sin descarga
    /// (movido, o ya canónico); `None` ordena continuar con la descarga.
    async fn attempt_move(
        &self,
        item: &MediaItem,
        voyage_slug: &str,
        known_presidents: &[String],
        existing: &LinkIndexEntry,
        report: &mut ItemOutcome,
    ) -> Option<MediaUploadOutcome> {
        let media_slug = item.media_slug.trim();
        let (old_bucket, old_key) = match parse_s3_url(&existing.s3_url) {
            Ok(parts) => parts,
            Err(_) => return None, // forma inesperada: se re-sube desde la fuente
        };

        let ext_for_new = extension_of_key(&old_key).unwrap_or_else(|| "bin".to_string());
        let new_original_key =
            original_key(voyage_slug, media_slug, &ext_for_new, &item.credit, known_presidents);

        let resolved_type = item
            .media_type
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| Some(existing.media_type.clone()).filter(|t| !t.trim().is_empty()))
            .unwrap_or_else(|| MediaType::from_extension(&ext_for_new).as_str().to_string());
        let is_image = resolved_type == "image";

        if old_key == new_original_key {
            // Estado estable: mismo enlace, misma clave canónica. Cero I/O.
            let public_url = is_image.then(|| {
                let preview_key = derivative_key(
                    voyage_slug,
                    media_slug,
                    &ext_for_new,
                    &item.credit,
                    known_presidents,
                    DerivativeKind::Preview,
                );
                public_http_url(&self.config.public_bucket, &preview_key)
            });
            return Some(MediaUploadOutcome {
                s3_url: Some(existing.s3_url.clone()),
                public_derivative_url: public_url,
            });
        }

        // Clave desplazada: COPY al destino canónico y DELETE del origen.
        let moved: Result<(), MediaError> = async {
            self.store
                .copy(&old_bucket, &old_key, &self.config.private_bucket, &new_original_key, None)
                .await?;
            self.store.delete(&old_bucket, &old_key).await?;
            Ok(())
        }
        .await;

        if let Err(fault) = moved {
            report
                .warnings
                .push(format!("{media_slug}: failed to move existing S3 object for same link: {fault}"));
            return None;
        }
        report.s3_deleted += 1;

        // Derivados del original anterior: COPY best-effort, fallos ignorados
        // (el derivado puede no existir para tipos no imagen).
        let new_preview_key = derivative_key(
            voyage_slug,
            media_slug,
            &ext_for_new,
            &item.credit,
            known_presidents,
            DerivativeKind::Preview,
        );
        let new_thumb_key = derivative_key(
            voyage_slug,
            media_slug,
            &ext_for_new,
            &item.credit,
            known_presidents,
            DerivativeKind::Thumb,
        );
        if let Some((old_preview_key, old_thumb_key)) = derivative_keys_from_original(&old_key) {
            for (old_derivative, new_derivative) in
                [(old_preview_key, &new_preview_key), (old_thumb_key, &new_thumb_key)]
            {
                let copied = self
                    .store
                    .copy(
                        &self.config.public_bucket,
                        &old_derivative,
                        &self.config.public_bucket,
                        new_derivative,
                        Some("image/jpeg"),
                    )
                    .await;
                if copied.is_ok() {
                    if self.store.delete(&self.config.public_bucket, &old_derivative).await.is_ok() {
                        report.s3_deleted += 1;
                    }
                }
            }
        }

        info!("📦 [MEDIA]: Renamed media for same link -> {new_original_key}");
        Some(MediaUploadOutcome {
            s3_url: Some(s3_url(&self.config.private_bucket, &new_original_key)),
            public_derivative_url: Some(public_http_url(&self.config.public_bucket, &new_preview_key)),
        })
    }

    // ------- Pipeline por ítem -------

    async fn process_item(
        &self,
        index: usize,
        item: &MediaItem,
        voyage_slug: &str,
        known_presidents: &[String],
        link_index: &HashMap<String, LinkIndexEntry>,
    ) -> ItemOutcome {
        let mut report = ItemOutcome {
            index,
            media_slug: item.media_slug.trim().to_string(),
            outcome: None,
            resolved_media_type: None,
            warnings: Vec::new(),
            s3_deleted: 0,
        };

        let media_slug = item.media_slug.trim().to_string();
        let link = item.google_drive_link.trim().to_string();
        if media_slug.is_empty() || link.is_empty() {
            report.warnings.push(format!("media #{} missing slug or link; skipping", index + 1));
            return report;
        }

        // 1) Move-on-rename contra el índice de enlaces existente
        if let Some(existing) = link_index.get(&link.to_lowercase()) {
            if !existing.s3_url.trim().is_empty() {
                if let Some(outcome) =
                    self.attempt_move(item, voyage_slug, known_presidents, existing, &mut report).await
                {
                    report.outcome = Some(outcome);
                    return report;
                }
            }
        }

        // 2) Descarga desde el proveedor clasificado
        let downloaded = match classify_link(&link) {
            SourceLink::Drive { file_id } => match self.download_drive(&file_id).await {
                Ok(payload) => payload,
                Err(fault) => {
                    report.warnings.push(format!("{media_slug}: failed to download from Drive: {fault}"));
                    report.outcome = Some(MediaUploadOutcome::default());
                    return report;
                }
            },
            SourceLink::Dropbox { shared_url } => match self.download_dropbox(&shared_url).await {
                Ok(payload) => payload,
                Err(fault) => {
                    report.warnings.push(format!("{media_slug}: failed to download from Dropbox: {fault}"));
                    report.outcome = Some(MediaUploadOutcome::default());
                    return report;
                }
            },
            SourceLink::Unsupported => {
                report.warnings.push(format!("{media_slug}: unsupported media link (not Drive/Dropbox)"));
                report.outcome = Some(MediaUploadOutcome::default());
                return report;
            }
        };
        let (bytes, mime, filename_hint) = downloaded;

        // 3) Extensión física y taxonomía
        let hint = filename_hint.unwrap_or_else(|| item.title.clone().unwrap_or_default());
        let ext = guess_extension(&mime, &hint);
        let media_type = item
            .media_type
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| MediaType::from_extension(&ext).as_str().to_string());
        report.resolved_media_type = Some(media_type.clone());

        // 4) PUT del original bajo su clave canónica
        let canonical_key = original_key(voyage_slug, &media_slug, &ext, &item.credit, known_presidents);
        let private_url = match self
            .store
            .put(&self.config.private_bucket, &canonical_key, bytes.clone(), Some(&mime))
            .await
        {
            Ok(()) => Some(s3_url(&self.config.private_bucket, &canonical_key)),
            Err(fault) => {
                report.warnings.push(format!(
                    "{media_slug}: failed to upload original to s3://{}/{canonical_key}: {fault}",
                    self.config.private_bucket
                ));
                None
            }
        };

        // 5) Derivados JPEG para imágenes (CPU aislado del reactor)
        let mut public_url = None;
        if media_type == "image" && !bytes.is_empty() {
            let forge_input = bytes.clone();
            let forged = tokio::task::spawn_blocking(move || make_image_derivatives(&forge_input))
                .await
                .map_err(|join_fault| MediaError::Image(format!("DERIVATIVE_POOL_FAULT: {join_fault}")))
                .and_then(|inner| inner);
            match forged {
                Ok((preview_bytes, thumb_bytes)) => {
                    let preview_key = derivative_key(
                        voyage_slug,
                        &media_slug,
                        &ext,
                        &item.credit,
                        known_presidents,
                        DerivativeKind::Preview,
                    );
                    let thumb_key = derivative_key(
                        voyage_slug,
                        &media_slug,
                        &ext,
                        &item.credit,
                        known_presidents,
                        DerivativeKind::Thumb,
                    );
                    let uploaded: Result<(), MediaError> = async {
                        self.store
                            .put(&self.config.public_bucket, &preview_key, preview_bytes, Some("image/jpeg"))
                            .await?;
                        self.store
                            .put(&self.config.public_bucket, &thumb_key, thumb_bytes, Some("image/jpeg"))
                            .await?;
                        Ok(())
                    }
                    .await;
                    match uploaded {
                        Ok(()) => public_url = Some(public_http_url(&self.config.public_bucket, &preview_key)),
                        Err(fault) => report
                            .warnings
                            .push(format!("{media_slug}: failed to create/upload derivatives: {fault}")),
                    }
                }
                Err(fault) => report
                    .warnings
                    .push(format!("{media_slug}: failed to create/upload derivatives: {fault}")),
            }
        }

        info!("🖼️ [MEDIA]: Processed media {media_slug} (type={media_type}) -> {canonical_key}");
        report.outcome = Some(MediaUploadOutcome { s3_url: private_url, public_derivative_url: public_url });
        report
    }

    /// Procesa la media de un voyage con fan-out acotado y orden declarado.
    ///
    /// Escribe de vuelta el `media_type` resuelto de cada ítem y retorna el
    /// mapa `media_slug -> desenlace` junto con los warnings acumulados.
    pub async fn process_voyage_media(
        &self,
        items: &mut [MediaItem],
        voyage_slug: &str,
        known_presidents: &[String],
        link_index: &HashMap<String, LinkIndexEntry>,
    ) -> VoyageMediaReport {
        let mut report = VoyageMediaReport::default();
        if items.is_empty() {
            return report;
        }

        let snapshot: Vec<MediaItem> = items.to_vec();
        let worker_count = self.config.worker_count.max(1);
        let outcomes: Vec<ItemOutcome> = futures::stream::iter(
            snapshot
                .iter()
                .enumerate()
                .map(|(index, item)| self.process_item(index, item, voyage_slug, known_presidents, link_index)),
        )
        .buffered(worker_count)
        .collect()
        .await;

        for item_outcome in outcomes {
            for warning in &item_outcome.warnings {
                warn!("⚠️ [MEDIA]: {warning}");
            }
            report.warnings.extend(item_outcome.warnings);
            report.s3_deleted += item_outcome.s3_deleted;
            if let Some(resolved) = item_outcome.resolved_media_type {
                let slot = &mut items[item_outcome.index];
                if slot.media_type.as_deref().map_or(true, |t| t.trim().is_empty()) {
                    slot.media_type = Some(resolved);
                }
            }
            if let Some(outcome) = item_outcome.outcome {
                report.links.insert(item_outcome.media_slug, outcome);
            }
        }
        report
    }
}
