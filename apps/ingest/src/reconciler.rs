// [apps/ingest/src/reconciler.rs]
/*!
 * =================================================================
 * APARATO: THREE-WAY RECONCILER DRIVER (V4.9)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L6)
 * RESPONSABILIDAD: ORQUESTACIÓN DE PODAS DOC <-> DB <-> PLANILLA
 *
 * # Logic:
 * El documento es la verdad. La poda global retira voyages ausentes de
 * DB y planilla; la poda per-voyage retira joins sobrantes y maestros
 * desreferenciados. El almacén de objetos queda fuera: es aditivo.
 * =================================================================
 */

use std::collections::HashSet;

use anyhow::{Context, Result};
use tracing::info;

use sequoia_domain_models::VoyageBundle;
use sequoia_infra_db::repositories::{DbPruneStats, GlobalDbPruneStats, ReconcileRepository};
use sequoia_infra_gsuite::writer::SheetPruneStats;
use sequoia_infra_gsuite::SheetsWriter;

/// Desenlace de la reconciliación global previa a los voyages.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalReconcileStats {
    pub sheets_deleted_rows: usize,
    pub db: GlobalDbPruneStats,
}

impl GlobalReconcileStats {
    /// Voyages ausentes del documento detectados en cualquier almacén.
    pub fn missing_count(&self) -> usize {
        self.db.deleted_voyages.max(self.sheets_deleted_rows)
    }
}

/// Desenlace de la poda per-voyage (ambos almacenes).
#[derive(Debug, Clone, Copy, Default)]
pub struct VoyagePruneOutcome {
    pub sheets: SheetPruneStats,
    pub db: DbPruneStats,
}

/// Poda global de voyages ausentes del documento en planilla y DB.
pub async fn global_reconcile(
    db_reconcile: &ReconcileRepository,
    sheets: &SheetsWriter,
    desired_voyage_slugs: &HashSet<String>,
    dry_run: bool,
) -> Result<GlobalReconcileStats> {
    let sheets_deleted_rows = sheets
        .prune_missing_voyages(desired_voyage_slugs)
        .await
        .context("global sheet reconcile failed")?;
    let db = db_reconcile
        .prune_missing_voyages(desired_voyage_slugs, dry_run)
        .await
        .context("global DB reconcile failed")?;

    info!(
        "🌐 [RECONCILE]: Global exactness pass: sheets_rows={} db_voyages={} (dry_run={dry_run})",
        sheets_deleted_rows, db.deleted_voyages
    );
    Ok(GlobalReconcileStats { sheets_deleted_rows, db })
}

/// Poda per-voyage tras el upsert de planilla: joins sobrantes en la
/// planilla, luego joins y maestros desreferenciados en la DB.
pub async fn reconcile_voyage(
    db_reconcile: &ReconcileRepository,
    sheets: &SheetsWriter,
    bundle: &VoyageBundle,
    dry_run: bool,
) -> Result<VoyagePruneOutcome> {
    let voyage_slug = bundle.voyage.voyage_slug.as_str();

    let sheet_stats = sheets
        .prune_voyage_joins(bundle)
        .await
        .with_context(|| format!("sheet join prune failed for {voyage_slug}"))?;

    let desired_media: HashSet<String> = bundle.media.iter().map(|m| m.media_slug.clone()).collect();
    let desired_people: HashSet<String> = bundle.passengers.iter().map(|p| p.person_slug.clone()).collect();

    let db_stats = db_reconcile
        .prune_voyage_joins(voyage_slug, &desired_media, &desired_people, !dry_run, dry_run)
        .await
        .with_context(|| format!("DB join prune failed for {voyage_slug}"))?;

    Ok(VoyagePruneOutcome { sheets: sheet_stats, db: db_stats })
}
