// [libs/infra/gsuite/src/index_cache.rs]
/*!
 * =================================================================
 * APARATO: TAB INDEX CACHE (V4.4 - SINGLE READ)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: ÍNDICE CLAVE->FILA EN MEMORIA POR PESTAÑA
 *
 * # Mathematical Proof (Read Elision):
 * La pestaña se lee una única vez por corrida. Todo upsert posterior
 * actualiza el índice en memoria en el mismo paso que la escritura
 * remota, por lo que el número de lecturas por pestaña es O(1) y no
 * O(escrituras).
 * =================================================================
 */

use std::collections::{HashMap, HashSet};

/// Separador interno de claves compuestas (jamás aparece en un slug).
const KEY_SEPARATOR: char = '\u{1f}';

/// Desenlace de un upsert contra el índice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertDisposition {
    /// La clave existía: la fila remota se reescribe en su lugar.
    Updated,
    /// Clave nueva: la fila se agrega al final de la pestaña.
    Appended,
}

/// Instantánea en memoria de una pestaña: cabecera, filas y mapa de claves.
#[derive(Debug, Clone)]
pub struct TabIndexCache {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    key_columns: Vec<String>,
    key_to_row: Option<HashMap<String, usize>>,
}

/// Compone la clave de negocio desde sus partes.
pub fn compose_key(parts: &[String]) -> String {
    parts.join(&KEY_SEPARATOR.to_string())
}

impl TabIndexCache {
    /// Construye la instantánea desde la lectura completa de la pestaña.
    ///
    /// `grid[0]` es la fila de cabecera; su ausencia implica pestaña vacía.
    pub fn from_grid(grid: Vec<Vec<String>>, key_columns: &[&str]) -> Self {
        let mut iter = grid.into_iter();
        let header = iter.next().unwrap_or_default();
        Self {
            header,
            rows: iter.collect(),
            key_columns: key_columns.iter().map(|c| c.to_string()).collect(),
            key_to_row: None,
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Reemplaza cabecera y filas tras un reset total de la pestaña.
    pub fn replace(&mut self, header: Vec<String>, rows: Vec<Vec<String>>) {
        self.header = header;
        self.rows = rows;
        self.key_to_row = None;
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    fn cell<'a>(row: &'a [String], index: usize) -> &'a str {
        row.get(index).map(String::as_str).unwrap_or("")
    }

    /// Clave de negocio de una fila, o `None` si alguna parte está vacía.
    fn key_of_row(&self, row: &[String]) -> Option<String> {
        let mut parts: Vec<String> = Vec::with_capacity(self.key_columns.len());
        for column in &self.key_columns {
            let index = self.column_index(column)?;
            let value = Self::cell(row, index).trim();
            if value.is_empty() {
                return None;
            }
            parts.push(value.to_string());
        }
        Some(compose_key(&parts))
    }

    /// Construcción perezosa del mapa clave->índice de fila.
    fn ensure_index(&mut self) {
        if self.key_to_row.is_some() {
            return;
        }
        let mut index = HashMap::with_capacity(self.rows.len());
        for (position, row) in self.rows.iter().enumerate() {
            if let Some(key) = self.key_of_row(row) {
                index.insert(key, position);
            }
        }
        self.key_to_row = Some(index);
    }

    /// Alinea un registro `(cabecera, valor)` a la cabecera real de la pestaña.
    fn align(&self, base: Option<&[String]>, record: &[(&str, String)]) -> Vec<String> {
        let mut row: Vec<String> = match base {
            Some(existing) => {
                let mut padded = existing.to_vec();
                padded.resize(self.header.len().max(existing.len()), String::new());
                padded
            }
            None => vec![String::new(); self.header.len()],
        };
        for (column, value) in record {
            if let Some(index) = self.column_index(column) {
                if index >= row.len() {
                    row.resize(index + 1, String::new());
                }
                row[index] = value.clone();
            }
        }
        row
    }

    /// Upsert en memoria; retorna la disposición, el número de fila física
    /// (1-based, cabecera incluida) y la fila completa a escribir.
    pub fn upsert(&mut self, record: &[(&str, String)]) -> (UpsertDisposition, usize, Vec<String>) {
        self.ensure_index();
        let probe = self.align(None, record);
        let key = self.key_of_row(&probe).unwrap_or_default();

        let existing_position = self
            .key_to_row
            .as_ref()
            .and_then(|index| index.get(&key).copied());

        match existing_position {
            Some(position) => {
                let existing_row = self.rows[position].clone();
                let merged = self.align(Some(existing_row.as_slice()), record);
                self.rows[position] = merged.clone();
                (UpsertDisposition::Updated, position + 2, merged)
            }
            None => {
                let aligned = probe;
                self.rows.push(aligned.clone());
                let position = self.rows.len() - 1;
                if let Some(index) = self.key_to_row.as_mut() {
                    index.insert(key, position);
                }
                (UpsertDisposition::Appended, position + 2, aligned)
            }
        }
    }

    /// Índices de datos (0-based) de las filas cuya clave pertenece al set,
    /// en orden DESCENDENTE para la poda bottom-up; las filas se retiran de
    /// la instantánea en el mismo paso.
    pub fn remove_keys(&mut self, keys: &HashSet<String>) -> Vec<usize> {
        if keys.is_empty() {
            return Vec::new();
        }
        let mut doomed: Vec<usize> = Vec::new();
        for (position, row) in self.rows.iter().enumerate() {
            if let Some(key) = self.key_of_row(row) {
                if keys.contains(&key) {
                    doomed.push(position);
                }
            }
        }
        doomed.sort_unstable_by(|a, b| b.cmp(a));
        for &position in &doomed {
            self.rows.remove(position);
        }
        self.key_to_row = None;
        doomed
    }

    /// Proyección columna->valor de cada fila, para lectores de mapas.
    pub fn rows_as_records(&self) -> Vec<HashMap<String, String>> {
        self.rows
            .iter()
            .map(|row| {
                self.header
                    .iter()
                    .enumerate()
                    .map(|(index, column)| (column.trim().to_lowercase(), Self::cell(row, index).to_string()))
                    .collect()
            })
            .collect()
    }
}
