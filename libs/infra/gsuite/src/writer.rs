// [libs/infra/gsuite/src/writer.rs]
/*!
 * =================================================================
 * APARATO: SPREADSHEET PROJECTION WRITER (V4.5 - EXACT MATCH)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: UPSERT POR CLAVE, RESET PRESIDENCIAL Y PODAS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. ONE-SHOT ENSURE: Metadatos y cabeceras se reconcilian una vez por
 *    corrida; pestañas faltantes se crean en un único batch.
 * 2. BOTTOM-UP PRUNE: deleteDimension se emite de índice mayor a menor
 *    en un solo batch para que los índices no se desplacen.
 * 3. EXACT MATCH: Tras la corrida, las pestañas reflejan el documento;
 *    las filas ausentes del set deseado se retiran.
 * =================================================================
 */

use std::collections::{HashMap, HashSet};

use serde_json::json;
use tokio::sync::Mutex;
use tracing::{info, warn};

use sequoia_domain_models::{MediaLinkSet, MediaUploadOutcome, President, VoyageBundle};
use sequoia_core_slugger::media_sort_order;
use sequoia_infra_rpc::ReadCache;

use crate::client::GoogleApiClient;
use crate::errors::GsuiteError;
use crate::index_cache::{compose_key, TabIndexCache, UpsertDisposition};
use crate::rows;
use crate::tabs;

/// Fila preexistente de la pestaña media, índice del move-on-rename.
#[derive(Debug, Clone, Default)]
pub struct ExistingMediaRow {
    pub s3_url: String,
    pub media_type: String,
    pub credit: String,
    pub media_slug: String,
    pub voyage_slug: String,
}

/// Contadores de poda de joins de planilla para el log de auditoría.
#[derive(Debug, Clone, Copy, Default)]
pub struct SheetPruneStats {
    pub deleted_voyage_media: usize,
    pub deleted_voyage_passengers: usize,
}

/// Proyección de la planilla operativa; toda llamada cruza el arnés C4.
pub struct SheetsWriter {
    client: GoogleApiClient,
    spreadsheet_id: String,
    presidents_tab_title: String,
    dry_run: bool,
    read_cache: ReadCache<(String, String), Vec<Vec<String>>>,
    tab_ids: std::sync::RwLock<HashMap<String, i64>>,
    index: Mutex<HashMap<String, TabIndexCache>>,
}

impl SheetsWriter {
    pub fn new(
        client: GoogleApiClient,
        spreadsheet_id: String,
        presidents_tab_title: String,
        dry_run: bool,
    ) -> Self {
        Self {
            client,
            spreadsheet_id,
            presidents_tab_title,
            dry_run,
            read_cache: ReadCache::new(),
            tab_ids: std::sync::RwLock::new(HashMap::new()),
            index: Mutex::new(HashMap::new()),
        }
    }

    /// Título físico de una pestaña lógica (el tab presidencial es configurable).
    fn tab_title(&self, logical_tab: &str) -> String {
        if logical_tab == tabs::PRESIDENTS_TAB {
            self.presidents_tab_title.clone()
        } else {
            logical_tab.to_string()
        }
    }

    fn sheet_id_of(&self, title: &str) -> Result<i64, GsuiteError> {
        self.tab_ids
            .read()
            .expect("tab_ids envenenado")
            .get(title)
            .copied()
            .ok_or_else(|| GsuiteError::TabNotFound(title.to_string()))
    }

    async fn refresh_tab_metadata(&self) -> Result<(), GsuiteError> {
        let properties = self.client.spreadsheet_tabs(&self.spreadsheet_id).await?;
        let mut ids = self.tab_ids.write().expect("tab_ids envenenado");
        ids.clear();
        for tab in properties {
            ids.insert(tab.title, tab.sheet_id);
        }
        Ok(())
    }

    /// Lectura completa de una pestaña a través de la caché de sesión.
    async fn fetch_tab_grid(&self, title: &str) -> Result<Vec<Vec<String>>, GsuiteError> {
        let cache_key = (self.spreadsheet_id.clone(), title.to_string());
        if let Some(grid) = self.read_cache.get(&cache_key) {
            return Ok(grid);
        }
        let grid = self.client.values_get(&self.spreadsheet_id, &format!("{title}!A:ZZ")).await?;
        self.read_cache.put(cache_key, grid.clone());
        Ok(grid)
    }

    /// Fase one-shot: crea pestañas faltantes, corrige cabeceras en un
    /// batch y siembra el índice por pestaña con una única lectura.
    pub async fn ensure_tabs(&self) -> Result<(), GsuiteError> {
        self.refresh_tab_metadata().await?;

        let missing: Vec<String> = {
            let ids = self.tab_ids.read().expect("tab_ids envenenado");
            tabs::MANAGED_TABS
                .iter()
                .map(|logical| self.tab_title(logical))
                .filter(|title| !ids.contains_key(title))
                .collect()
        };
        if !missing.is_empty() {
            info!("🧾 [SHEETS]: Creating {} missing tab(s): {missing:?}", missing.len());
            let requests = missing
                .iter()
                .map(|title| json!({ "addSheet": { "properties": { "title": title } } }))
                .collect();
            self.client.spreadsheet_batch_update(&self.spreadsheet_id, requests).await?;
            self.refresh_tab_metadata().await?;
        }

        let mut header_corrections: Vec<(String, Vec<Vec<String>>)> = Vec::new();
        let mut seeded: HashMap<String, TabIndexCache> = HashMap::new();

        for logical in tabs::MANAGED_TABS {
            let title = self.tab_title(logical);
            let expected: Vec<String> = tabs::expected_headers(logical).iter().map(|h| h.to_string()).collect();
            let mut grid = self.fetch_tab_grid(&title).await?;

            let header_matches = grid
                .first()
                .is_some_and(|actual| {
                    actual.len() >= expected.len()
                        && expected
                            .iter()
                            .enumerate()
                            .all(|(i, column)| actual[i].trim().eq_ignore_ascii_case(column))
                });
            if !header_matches {
                header_corrections.push((format!("{title}!A1"), vec![expected.clone()]));
                if grid.is_empty() {
                    grid.push(expected.clone());
                } else {
                    grid[0] = expected.clone();
                }
            }

            seeded.insert(logical.to_string(), TabIndexCache::from_grid(grid, tabs::key_columns(logical)));
        }

        if !header_corrections.is_empty() {
            info!("🧾 [SHEETS]: Correcting {} header row(s) in one batch", header_corrections.len());
            self.client.values_batch_update(&self.spreadsheet_id, header_corrections).await?;
        }

        *self.index.lock().await = seeded;
        Ok(())
    }

    /// Upsert por clave de negocio: hit -> update de rango, miss -> append.
    /// La instantánea en memoria se actualiza en el mismo paso, por lo que
    /// no hay lecturas de seguimiento.
    pub async fn upsert(&self, logical_tab: &str, record: &[(&str, String)]) -> Result<UpsertDisposition, GsuiteError> {
        let title = self.tab_title(logical_tab);
        let (disposition, row_number, row) = {
            let mut index = self.index.lock().await;
            let cache = index
                .get_mut(logical_tab)
                .ok_or_else(|| GsuiteError::TabNotFound(title.clone()))?;
            cache.upsert(record)
        };

        match disposition {
            UpsertDisposition::Updated => {
                self.client
                    .values_update(&self.spreadsheet_id, &format!("{title}!A{row_number}"), vec![row])
                    .await?;
            }
            UpsertDisposition::Appended => {
                self.client
                    .values_append(&self.spreadsheet_id, &format!("{title}!A1"), vec![row])
                    .await?;
            }
        }
        Ok(disposition)
    }

    /// Proyecta un paquete completo: voyage, maestros y filas join.
    pub async fn upsert_bundle(&self, bundle: &VoyageBundle, links: &MediaLinkSet) -> Result<(), GsuiteError> {
        let voyage_slug = bundle.voyage.voyage_slug.as_str();

        self.upsert(tabs::VOYAGES_TAB, &rows::voyage_record(&bundle.voyage)).await?;

        for person in &bundle.passengers {
            self.upsert(tabs::PASSENGERS_TAB, &rows::passenger_record(person)).await?;
            self.upsert(tabs::VOYAGE_PASSENGERS_TAB, &rows::voyage_passenger_record(voyage_slug, person))
                .await?;
        }

        let fallback = MediaUploadOutcome::default();
        for item in &bundle.media {
            let outcome = links.get(&item.media_slug).unwrap_or(&fallback);
            self.upsert(tabs::MEDIA_TAB, &rows::media_record(item, voyage_slug, outcome)).await?;
            self.upsert(
                tabs::VOYAGE_MEDIA_TAB,
                &rows::voyage_media_record(voyage_slug, item, media_sort_order(&item.media_slug)),
            )
            .await?;
        }

        if !bundle.voyage.president_slug.is_empty() {
            self.upsert(
                tabs::VOYAGE_PRESIDENTS_TAB,
                &rows::voyage_president_record(voyage_slug, &bundle.voyage.president_slug),
            )
            .await?;
        }
        Ok(())
    }

    /// Reset total de la pestaña presidencial: clear + cabecera + lista completa.
    pub async fn reset_presidents(&self, presidents: &[President]) -> Result<(), GsuiteError> {
        let title = self.tab_title(tabs::PRESIDENTS_TAB);
        let header: Vec<String> = tabs::PRESIDENTS_HEADERS.iter().map(|h| h.to_string()).collect();
        let data_rows: Vec<Vec<String>> = presidents.iter().map(rows::president_row).collect();

        self.client.values_clear(&self.spreadsheet_id, &format!("{title}!A:ZZ")).await?;
        let mut payload = vec![header.clone()];
        payload.extend(data_rows.clone());
        self.client.values_update(&self.spreadsheet_id, &format!("{title}!A1"), payload).await?;

        if let Some(cache) = self.index.lock().await.get_mut(tabs::PRESIDENTS_TAB) {
            cache.replace(header, data_rows);
        }
        self.read_cache.invalidate_key(&(self.spreadsheet_id.clone(), title));
        info!("🏛️ [SHEETS]: Presidents tab reset with {} row(s)", presidents.len());
        Ok(())
    }

    /// Poda por clave compuesta, bottom-up y en un único batch.
    async fn delete_rows_by_keys(&self, logical_tab: &str, keys: &HashSet<String>) -> Result<usize, GsuiteError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let title = self.tab_title(logical_tab);

        if self.dry_run {
            let index = self.index.lock().await;
            let cache = index
                .get(logical_tab)
                .ok_or_else(|| GsuiteError::TabNotFound(title.clone()))?;
            let doomed = cache.clone().remove_keys(keys);
            warn!("🧪 [SHEETS/DRY]: Would delete {} row(s) from '{title}'", doomed.len());
            return Ok(doomed.len());
        }

        let doomed: Vec<usize> = {
            let mut index = self.index.lock().await;
            let cache = index
                .get_mut(logical_tab)
                .ok_or_else(|| GsuiteError::TabNotFound(title.clone()))?;
            cache.remove_keys(keys)
        };
        if doomed.is_empty() {
            return Ok(0);
        }

        let sheet_id = self.sheet_id_of(&title)?;
        // Índices descendentes: el batch no desplaza las filas pendientes.
        let requests = doomed
            .iter()
            .map(|&data_index| {
                json!({
                    "deleteDimension": {
                        "range": {
                            "sheetId": sheet_id,
                            "dimension": "ROWS",
                            "startIndex": data_index + 1,
                            "endIndex": data_index + 2,
                        }
                    }
                })
            })
            .collect();
        self.client.spreadsheet_batch_update(&self.spreadsheet_id, requests).await?;
        info!("✂️ [SHEETS]: Pruned {} row(s) from '{title}'", doomed.len());
        Ok(doomed.len())
    }

    /// Poda per-voyage de joins: retira filas cuyo par compuesto no está
    /// en el paquete recién upserteado.
    pub async fn prune_voyage_joins(&self, bundle: &VoyageBundle) -> Result<SheetPruneStats, GsuiteError> {
        let voyage_slug = bundle.voyage.voyage_slug.as_str();
        let desired_media: HashSet<String> = bundle.media.iter().map(|m| m.media_slug.clone()).collect();
        let desired_passengers: HashSet<String> =
            bundle.passengers.iter().map(|p| p.person_slug.clone()).collect();

        let vm_keys = self
            .stale_join_keys(tabs::VOYAGE_MEDIA_TAB, voyage_slug, "media_slug", &desired_media)
            .await?;
        let vp_keys = self
            .stale_join_keys(tabs::VOYAGE_PASSENGERS_TAB, voyage_slug, "person_slug", &desired_passengers)
            .await?;
        let pres_keys = {
            let desired: HashSet<String> = std::iter::once(bundle.voyage.president_slug.clone())
                .filter(|s| !s.is_empty())
                .collect();
            self.stale_join_keys(tabs::VOYAGE_PRESIDENTS_TAB, voyage_slug, "president_slug", &desired)
                .await?
        };

        let deleted_voyage_media = self.delete_rows_by_keys(tabs::VOYAGE_MEDIA_TAB, &vm_keys).await?;
        let deleted_voyage_passengers =
            self.delete_rows_by_keys(tabs::VOYAGE_PASSENGERS_TAB, &vp_keys).await?;
        self.delete_rows_by_keys(tabs::VOYAGE_PRESIDENTS_TAB, &pres_keys).await?;

        Ok(SheetPruneStats { deleted_voyage_media, deleted_voyage_passengers })
    }

    async fn stale_join_keys(
        &self,
        logical_tab: &str,
        voyage_slug: &str,
        other_column: &str,
        desired: &HashSet<String>,
    ) -> Result<HashSet<String>, GsuiteError> {
        let index = self.index.lock().await;
        let cache = index
            .get(logical_tab)
            .ok_or_else(|| GsuiteError::TabNotFound(self.tab_title(logical_tab)))?;
        let mut stale = HashSet::new();
        for record in cache.rows_as_records() {
            let row_voyage = record.get("voyage_slug").map(String::as_str).unwrap_or("");
            let other = record.get(other_column).map(String::as_str).unwrap_or("");
            if row_voyage == voyage_slug && !other.is_empty() && !desired.contains(other) {
                stale.insert(compose_key(&[row_voyage.to_string(), other.to_string()]));
            }
        }
        Ok(stale)
    }

    /// Poda global: todo voyage ausente del set deseado desaparece de la
    /// pestaña maestra y de las pestañas join con clave de voyage.
    pub async fn prune_missing_voyages(&self, desired: &HashSet<String>) -> Result<usize, GsuiteError> {
        let mut total = 0usize;
        for logical in [
            tabs::VOYAGES_TAB,
            tabs::VOYAGE_PASSENGERS_TAB,
            tabs::VOYAGE_MEDIA_TAB,
            tabs::VOYAGE_PRESIDENTS_TAB,
        ] {
            let keys = {
                let index = self.index.lock().await;
                let cache = index
                    .get(logical)
                    .ok_or_else(|| GsuiteError::TabNotFound(self.tab_title(logical)))?;
                let key_cols = tabs::key_columns(logical);
                let mut stale = HashSet::new();
                for record in cache.rows_as_records() {
                    let voyage = record.get("voyage_slug").map(String::as_str).unwrap_or("");
                    if voyage.is_empty() || desired.contains(voyage) {
                        continue;
                    }
                    let parts: Vec<String> = key_cols
                        .iter()
                        .map(|c| record.get(*c).cloned().unwrap_or_default())
                        .collect();
                    if parts.iter().all(|p| !p.is_empty()) {
                        stale.insert(compose_key(&parts));
                    }
                }
                stale
            };
            total += self.delete_rows_by_keys(logical, &keys).await?;
        }
        Ok(total)
    }

    /// Índice `enlace -> fila existente` de la pestaña media (move-on-rename).
    pub async fn media_link_map(&self) -> Result<HashMap<String, ExistingMediaRow>, GsuiteError> {
        let index = self.index.lock().await;
        let cache = index
            .get(tabs::MEDIA_TAB)
            .ok_or_else(|| GsuiteError::TabNotFound(tabs::MEDIA_TAB.to_string()))?;
        let mut map = HashMap::new();
        for record in cache.rows_as_records() {
            let link = record.get("google_drive_link").map(String::as_str).unwrap_or("").trim().to_lowercase();
            if link.is_empty() {
                continue;
            }
            map.insert(
                link,
                ExistingMediaRow {
                    s3_url: record.get("s3_url").cloned().unwrap_or_default(),
                    media_type: record.get("media_type").cloned().unwrap_or_default(),
                    credit: record.get("credit").cloned().unwrap_or_default(),
                    media_slug: record.get("media_slug").cloned().unwrap_or_default(),
                    voyage_slug: record.get("voyage_slug").cloned().unwrap_or_default(),
                },
            );
        }
        Ok(map)
    }

    /// Anexa las filas del log de auditoría en una sola llamada.
    pub async fn append_ingest_log(&self, log_rows: Vec<Vec<String>>) -> Result<(), GsuiteError> {
        if log_rows.is_empty() {
            return Ok(());
        }
        let title = self.tab_title(tabs::INGEST_LOG_TAB);
        let count = log_rows.len();
        self.client.values_append(&self.spreadsheet_id, &format!("{title}!A1"), log_rows).await?;
        info!("🧾 [SHEETS]: Appended {count} ingest_log row(s)");
        Ok(())
    }
}
