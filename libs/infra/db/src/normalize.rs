// [libs/infra/db/src/normalize.rs]
/*!
 * =================================================================
 * APARATO: COLUMN NORMALIZATION HELPERS (V4.8)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: TEXTO DEL DOCUMENTO -> VALORES SQL UNIFORMES
 *
 * # Logic:
 * Cadena vacía -> NULL; fechas YYYY-MM-DD y horas HH:MM[:SS] o error de
 * mapeo (la transacción del voyage colapsa y revierte); source_urls se
 * serializa como arreglo JSON.
 * =================================================================
 */

use libsql::Value;

use crate::errors::DbError;

/// Texto recortado o NULL.
pub fn ns(raw: Option<&str>) -> Value {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Value::Text(s.to_string()),
        None => Value::Null,
    }
}

fn is_canonical_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes.iter().enumerate().all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit())
}

fn is_canonical_time(s: &str) -> bool {
    let parts: Vec<&str> = s.split(':').collect();
    matches!(parts.len(), 2 | 3)
        && parts
            .iter()
            .all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_digit()))
}

/// Fecha canónica o NULL; formato inválido colapsa la transacción.
pub fn nd(raw: Option<&str>) -> Result<Value, DbError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Value::Null),
        Some(s) if is_canonical_date(s) => Ok(Value::Text(s.to_string())),
        Some(s) => Err(DbError::MappingError(format!("Bad date (YYYY-MM-DD): {s}"))),
    }
}

/// Hora canónica o NULL; formato inválido colapsa la transacción.
pub fn nt(raw: Option<&str>) -> Result<Value, DbError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Value::Null),
        Some(s) if is_canonical_time(s) => Ok(Value::Text(s.to_string())),
        Some(s) => Err(DbError::MappingError(format!("Bad time (HH:MM[:SS]): {s}"))),
    }
}

/// Variante leniente de fecha para filas del registro presidencial:
/// el formato inválido degrada a NULL con warning, no colapsa el reset.
pub fn nd_lenient(raw: Option<&str>) -> Value {
    match nd(raw) {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("⚠️ [DATABASE]: Ignoring non-YYYY-MM-DD date: {raw:?}");
            Value::Null
        }
    }
}

/// Año como entero o NULL; dígitos corruptos colapsan la transacción.
pub fn nyear(raw: Option<&str>) -> Result<Value, DbError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Value::Null),
        Some(s) => s
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| DbError::MappingError(format!("Bad year (integer): {s}"))),
    }
}

/// Secuencia de URLs fuente como arreglo JSON, NULL si está vacía.
pub fn nurls(urls: &[String]) -> Value {
    if urls.is_empty() {
        return Value::Null;
    }
    match serde_json::to_string(urls) {
        Ok(encoded) => Value::Text(encoded),
        Err(_) => Value::Null,
    }
}

/// Entero opcional o NULL (sort_order).
pub fn nint(value: Option<i64>) -> Value {
    match value {
        Some(n) => Value::Integer(n),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certify_empty_strings_become_null() {
        assert!(matches!(ns(Some("   ")), Value::Null));
        assert!(matches!(ns(None), Value::Null));
        assert!(matches!(ns(Some(" x ")), Value::Text(ref s) if s == "x"));
    }

    #[test]
    fn certify_date_and_time_gates() {
        assert!(matches!(nd(Some("1933-04-23")), Ok(Value::Text(_))));
        assert!(nd(Some("April 1933")).is_err());
        assert!(matches!(nt(Some("09:30")), Ok(Value::Text(_))));
        assert!(matches!(nt(Some("09:30:15")), Ok(Value::Text(_))));
        assert!(nt(Some("9:30")).is_err());
    }

    #[test]
    fn certify_source_urls_json_projection() {
        assert!(matches!(nurls(&[]), Value::Null));
        let urls = vec!["https://a".to_string(), "https://b".to_string()];
        match nurls(&urls) {
            Value::Text(encoded) => assert_eq!(encoded, r#"["https://a","https://b"]"#),
            other => panic!("unexpected value: {other:?}"),
        }
    }
}
