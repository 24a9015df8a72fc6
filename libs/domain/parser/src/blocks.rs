// [libs/domain/parser/src/blocks.rs]
/*!
 * =================================================================
 * APARATO: DOCUMENT MINI-LANGUAGES (V4.2)
 * CLASIFICACIÓN: DOMAIN ENGINE (ESTRATO L2)
 * RESPONSABILIDAD: BLOQUES KV Y BLOQUES DE LISTA DEL DOCUMENTO
 *
 * # Logic:
 * Dos mini-lenguajes conviven dentro de una sección:
 * - KV: líneas `clave: valor`, con continuación multilínea cuando el
 *   valor es `|` seguido de líneas indentadas.
 * - Lista: entradas `- clave: valor` cuyas líneas indentadas pertenecen
 *   a la misma entrada.
 * =================================================================
 */

use std::collections::HashMap;

/// Bloque clave-valor ya materializado de una sección.
pub type KvBlock = HashMap<String, String>;

fn is_continuation(line: &str) -> bool {
    line.starts_with("  ") || line.starts_with('\t')
}

/// Parsea un bloque KV con soporte de valores multilínea (`|`).
///
/// Líneas sin `:` se ignoran; las claves repetidas retienen la última
/// aparición, igual que el documento curatorial histórico.
pub fn parse_kv_block(lines: &[&str]) -> KvBlock {
    let mut out = KvBlock::new();
    let mut i = 0;
    while i < lines.len() {
        let stripped = lines[i].trim();
        if stripped.is_empty() {
            i += 1;
            continue;
        }
        let Some((raw_key, raw_value)) = stripped.split_once(':') else {
            i += 1;
            continue;
        };
        let key = raw_key.trim().to_string();
        let value = raw_value.trim();
        if value == "|" {
            i += 1;
            let mut buffer: Vec<&str> = Vec::new();
            while i < lines.len() {
                let next = lines[i];
                if is_continuation(next) || next.trim().is_empty() {
                    buffer.push(next.trim_start());
                    i += 1;
                } else {
                    break;
                }
            }
            out.insert(key, buffer.join("\n").trim_end().to_string());
        } else {
            out.insert(key, value.to_string());
            i += 1;
        }
    }
    out
}

/// Fragmenta un bloque de lista en entradas individuales.
///
/// Una entrada abre con `- ` en el margen; sus líneas indentadas o en
/// blanco le pertenecen. Cualquier otra línea cierra la entrada vigente.
pub fn split_entries_block<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut entries: Vec<Vec<&'a str>> = Vec::new();
    let mut current: Vec<&'a str> = Vec::new();
    for &line in lines {
        let stripped = line.trim();
        if let Some(head) = stripped.strip_prefix("- ") {
            if !current.is_empty() {
                entries.push(std::mem::take(&mut current));
            }
            current.push(head.trim());
        } else if is_continuation(line) {
            current.push(line.trim());
        } else if stripped.is_empty() {
            current.push("");
        } else if !current.is_empty() {
            entries.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        entries.push(current);
    }
    entries
}

/// Lee un campo del bloque KV: recortado, vacío -> `None`.
pub fn field(kv: &KvBlock, key: &str) -> Option<String> {
    kv.get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Primer campo presente entre varios alias del documento.
pub fn field_any(kv: &KvBlock, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| field(kv, k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certify_kv_block_with_multiline_value() {
        let lines = vec![
            "title: Fishing Trip",
            "summary_markdown: |",
            "  A quiet weekend",
            "  on the Potomac.",
            "origin: Washington Navy Yard",
        ];
        let kv = parse_kv_block(&lines);
        assert_eq!(kv.get("title").unwrap(), "Fishing Trip");
        assert_eq!(kv.get("summary_markdown").unwrap(), "A quiet weekend\non the Potomac.");
        assert_eq!(kv.get("origin").unwrap(), "Washington Navy Yard");
    }

    #[test]
    fn certify_kv_ignores_lines_without_colon() {
        let kv = parse_kv_block(&["just prose", "key: value"]);
        assert_eq!(kv.len(), 1);
        assert_eq!(kv.get("key").unwrap(), "value");
    }

    #[test]
    fn certify_list_block_entry_boundaries() {
        let lines = vec![
            "- slug: hopkins-harry",
            "  full_name: Harry Hopkins",
            "  capacity_role: advisor",
            "- slug: early-stephen",
            "  full_name: Stephen Early",
        ];
        let entries = split_entries_block(&lines);
        assert_eq!(entries.len(), 2);
        let first = parse_kv_block(&entries[0]);
        assert_eq!(first.get("slug").unwrap(), "hopkins-harry");
        assert_eq!(first.get("capacity_role").unwrap(), "advisor");
        let second = parse_kv_block(&entries[1]);
        assert_eq!(second.get("full_name").unwrap(), "Stephen Early");
    }

    #[test]
    fn certify_blank_lines_stay_inside_entry() {
        let lines = vec!["- title: Deck photo", "", "  credit: White House"];
        let entries = split_entries_block(&lines);
        assert_eq!(entries.len(), 1);
        let kv = parse_kv_block(&entries[0]);
        assert_eq!(kv.get("credit").unwrap(), "White House");
    }
}
