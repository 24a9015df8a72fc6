// [apps/ingest/src/pipeline.rs]
/*!
 * =================================================================
 * APARATO: VOYAGE INGEST PIPELINE (V4.9 - DOC IS TRUTH)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L6)
 * RESPONSABILIDAD: SECUENCIA MAESTRA DE LA CORRIDA DE INGESTA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SEQUENCE LAW: parse -> reset presidencial -> reconcile global ->
 *    por voyage: validar -> media -> planilla -> poda planilla ->
 *    reconcile DB -> upsert DB -> fila de auditoría.
 * 2. FAILURE CONTAINMENT: Un voyage fallido produce su fila ERROR y la
 *    corrida continúa con el siguiente.
 * 3. SERIAL VOYAGES: Los escritores comparten cuota RPC y una conexión
 *    transaccional; el fan-out vive solo dentro del fetcher de media.
 * =================================================================
 */

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use sequoia_domain_models::{PresidentRegistry, VoyageBundle};
use sequoia_domain_parser::parse_document;
use sequoia_domain_validator::validate_bundle;
use sequoia_infra_db::repositories::{PresidentRepository, ReconcileRepository, VoyageRepository};
use sequoia_infra_db::SequoiaDbClient;
use sequoia_infra_gsuite::{GoogleApiClient, SheetsWriter};
use sequoia_infra_media::engine::{MediaEngineConfig, VoyageMediaReport};
use sequoia_infra_media::{LinkIndexEntry, MediaEngine};
use sequoia_infra_object_store::ObjectStoreWriter;
use sequoia_infra_rpc::RpcHarness;

use crate::audit::{AuditRow, RunStatus};
use crate::config::IngestConfig;
use crate::reconciler::{self, GlobalReconcileStats};

/// Resumen final de la corrida para el código de salida y el log.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub voyages_processed: usize,
    pub error_voyages: usize,
    pub warnings_total: usize,
}

/// Sesión de ingesta: arnés, clientes y cachés viajan juntos, sin
/// globales de módulo.
pub struct IngestPipeline {
    config: IngestConfig,
    google_client: GoogleApiClient,
    sheets: SheetsWriter,
    media_engine: MediaEngine,
    presidents_repo: PresidentRepository,
    voyages_repo: VoyageRepository,
    reconcile_repo: ReconcileRepository,
}

impl IngestPipeline {
    /// Construye la sesión completa; falla antes de tocar los almacenes
    /// si el archivo relacional no responde.
    pub async fn assemble(config: IngestConfig) -> Result<Self> {
        let harness = Arc::new(RpcHarness::new(config.rpc_policy));

        let google_client = GoogleApiClient::new(config.google_api_access_token.clone(), Arc::clone(&harness));
        let sheets = SheetsWriter::new(
            google_client.clone(),
            config.spreadsheet_id.clone(),
            config.presidents_sheet_title.clone(),
            config.dry_run,
        );

        let store = ObjectStoreWriter::connect(&config.aws_region, config.dry_run).await;
        let media_engine = MediaEngine::new(
            Arc::clone(&harness),
            store,
            MediaEngineConfig {
                private_bucket: config.s3_private_bucket.clone(),
                public_bucket: config.s3_public_bucket.clone(),
                google_access_token: config.google_api_access_token.clone(),
                dropbox_access_token: config.dropbox_access_token.clone(),
                dropbox_timeout_seconds: config.dropbox_timeout,
                worker_count: config.media_workers,
            },
        );

        let db_client = SequoiaDbClient::connect(&config.database_url, config.database_auth_token.clone())
            .await
            .context("archive database ignition failed")?;

        Ok(Self {
            config,
            google_client,
            sheets,
            media_engine,
            presidents_repo: PresidentRepository::new(db_client.clone()),
            voyages_repo: VoyageRepository::new(db_client.clone()),
            reconcile_repo: ReconcileRepository::new(db_client),
        })
    }

    /// Ejecuta la corrida completa contra el documento maestro.
    pub async fn execute(&self) -> Result<RunSummary> {
        let run_identifier = Uuid::new_v4();
        info!(
            "⚓ [INGEST]: Run {run_identifier} starting (doc={}, dry_run={})",
            self.config.doc_id, self.config.dry_run
        );

        // --- FASE 1: DOCUMENTO -> PAQUETES ---
        let document_text = self
            .google_client
            .read_document_text(&self.config.doc_id)
            .await
            .context("master document read failed")?;
        let parsed = parse_document(&document_text);
        for warning in &parsed.warnings {
            warn!("⚠️ [PARSER]: {warning}");
        }
        if parsed.bundles.is_empty() {
            error!("❌ [INGEST]: No voyages found in the document.");
            return Ok(RunSummary::default());
        }
        info!(
            "📜 [INGEST]: Parsed {} voyage bundle(s) and {} president(s)",
            parsed.bundles.len(),
            parsed.presidents.len()
        );
        let registry = PresidentRegistry::from_presidents(&parsed.presidents);

        // --- FASE 2: PLANILLA LISTA + RESET PRESIDENCIAL ---
        self.sheets.ensure_tabs().await.context("tab ensure failed")?;
        self.presidents_repo
            .safe_reset(&parsed.presidents, self.config.dry_run)
            .await
            .context("president registry reset failed")?;
        self.sheets
            .reset_presidents(&parsed.presidents)
            .await
            .context("presidents tab reset failed")?;

        // --- FASE 3: EXACTITUD GLOBAL (DB + PLANILLA; S3 jamás) ---
        let desired_voyage_slugs: HashSet<String> = parsed
            .bundles
            .iter()
            .map(|b| b.voyage.voyage_slug.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let global_stats = reconciler::global_reconcile(
            &self.reconcile_repo,
            &self.sheets,
            &desired_voyage_slugs,
            self.config.dry_run,
        )
        .await?;

        // Índice de enlaces congelado al inicio: el move-on-rename compara
        // contra el estado previo a la corrida.
        let link_index: HashMap<String, LinkIndexEntry> = self
            .sheets
            .media_link_map()
            .await?
            .into_iter()
            .map(|(link, row)| {
                (
                    link,
                    LinkIndexEntry {
                        s3_url: row.s3_url,
                        media_type: row.media_type,
                        credit: row.credit,
                        media_slug: row.media_slug,
                        voyage_slug: row.voyage_slug,
                    },
                )
            })
            .collect();

        // --- FASE 4: PROCESAMIENTO SERIAL POR VOYAGE ---
        let run_timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let total = parsed.bundles.len();
        let mut log_rows: Vec<Vec<String>> = Vec::with_capacity(total + 1);
        let mut summary = RunSummary::default();

        for (position, mut bundle) in parsed.bundles.into_iter().enumerate() {
            let voyage_slug = bundle.voyage.voyage_slug.clone();
            let row_slug = if voyage_slug.is_empty() {
                format!("[bundle#{}]", position + 1)
            } else {
                voyage_slug.clone()
            };
            info!("--- ⛵ [INGEST]: Processing voyage {}/{}: {row_slug} ---", position + 1, total);

            let mut row = AuditRow::blank(&run_timestamp, &self.config.doc_id, &row_slug, self.config.dry_run);
            row.media_declared = bundle.media.len();

            // 4.1 Validación estructural y referencial
            let report = validate_bundle(&bundle, &registry);
            for warning in &report.warnings {
                warn!("⚠️ [VALIDATOR]: {row_slug}: {warning}");
            }
            if !report.errors.is_empty() {
                for fault in &report.errors {
                    error!("❌ [VALIDATOR]: {row_slug}: {fault}");
                }
                row.status = RunStatus::Error;
                row.errors_count = report.errors.len();
                row.warnings_count = report.warnings.len();
                row.notes = report.errors[0].clone();
                summary.error_voyages += 1;
                summary.warnings_total += row.warnings_count;
                summary.voyages_processed += 1;
                log_rows.push(row.to_cells());
                continue;
            }

            // 4.2-4.5 Media, planilla, podas y DB
            match self
                .process_voyage(&mut bundle, &registry, &link_index, report.warnings.len(), &mut row)
                .await
            {
                Ok(()) => {}
                Err(fault) => {
                    error!("❌ [INGEST]: Voyage {row_slug} collapsed: {fault:#}");
                    row.status = RunStatus::Error;
                    row.errors_count = row.errors_count.max(1);
                    row.notes = format!("{fault:#}");
                }
            }

            if row.status == RunStatus::Error {
                summary.error_voyages += 1;
            }
            summary.warnings_total += row.warnings_count;
            summary.voyages_processed += 1;
            log_rows.push(row.to_cells());
        }

        // --- FASE 5: FILA [GLOBAL] Y VOLCADO DEL LOG ---
        log_rows.push(self.global_row(&run_timestamp, &global_stats).to_cells());
        if let Err(fault) = self.sheets.append_ingest_log(log_rows).await {
            warn!("⚠️ [INGEST]: Failed to write ingest_log: {fault}");
        }

        if summary.error_voyages > 0 {
            warn!(
                "🏁 [INGEST]: Run {run_identifier} completed with {} error voyage(s) of {}",
                summary.error_voyages, summary.voyages_processed
            );
        } else {
            info!(
                "🏁 [INGEST]: Run {run_identifier} completed successfully: {} voyage(s) processed",
                summary.voyages_processed
            );
        }
        Ok(summary)
    }

    /// Secuencia por voyage tras una validación limpia. El orden es ley:
    /// media -> upsert planilla -> poda planilla -> reconcile DB -> upsert DB.
    async fn process_voyage(
        &self,
        bundle: &mut VoyageBundle,
        registry: &PresidentRegistry,
        link_index: &HashMap<String, LinkIndexEntry>,
        validation_warnings: usize,
        row: &mut AuditRow,
    ) -> Result<()> {
        let voyage_slug = bundle.voyage.voyage_slug.clone();

        // Media -> S3 (aditivo; solo move-on-rename borra)
        let media_report: VoyageMediaReport = self
            .media_engine
            .process_voyage_media(&mut bundle.media, &voyage_slug, registry.known_slugs(), link_index)
            .await;

        row.media_uploaded = media_report.links.values().filter(|o| o.s3_url.is_some()).count();
        row.thumbs_uploaded = media_report.links.values().filter(|o| o.public_derivative_url.is_some()).count();
        row.s3_deleted = media_report.s3_deleted;
        row.warnings_count = validation_warnings + media_report.warnings.len();
        row.notes = media_report.warnings.first().cloned().unwrap_or_else(|| "OK".to_string());

        // Planilla: upsert y poda exacta de joins
        self.sheets
            .upsert_bundle(bundle, &media_report.links)
            .await
            .with_context(|| format!("sheet upsert failed for {voyage_slug}"))?;

        let prune = reconciler::reconcile_voyage(&self.reconcile_repo, &self.sheets, bundle, self.config.dry_run)
            .await?;
        row.sheets_deleted_vm = prune.sheets.deleted_voyage_media;
        row.sheets_deleted_vp = prune.sheets.deleted_voyage_passengers;
        row.db_deleted_vm = prune.db.deleted_voyage_media;
        row.db_deleted_vp = prune.db.deleted_voyage_passengers;
        row.db_deleted_media = prune.db.deleted_media;
        row.db_deleted_people = prune.db.deleted_people;

        // Archivo relacional: transacción por voyage
        self.voyages_repo
            .upsert_bundle(bundle, &media_report.links)
            .await
            .context("DB upsert failed")?;

        row.status = RunStatus::classify(0, row.warnings_count);
        Ok(())
    }

    /// Fila [GLOBAL] de cierre, con el mapeo de columnas del reconcile.
    fn global_row(&self, timestamp: &str, stats: &GlobalReconcileStats) -> AuditRow {
        let mut row = AuditRow::blank(timestamp, &self.config.doc_id, "[GLOBAL]", self.config.dry_run);
        row.sheets_deleted_vm = stats.sheets_deleted_rows;
        row.db_deleted_vm = stats.db.deleted_voyage_media;
        row.db_deleted_vp = stats.db.deleted_voyage_passengers;
        row.db_deleted_media = stats.db.deleted_voyages;
        row.notes = format!("missing_count={}", stats.missing_count());
        row
    }
}
