//! Marcas de tiempo de registro (`datacad`)

use chrono::{DateTime, Duration, Utc};

const DATACAD_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formatea `now` desplazado `offset_hours` respecto a UTC
pub fn format_local_timestamp(now: DateTime<Utc>, offset_hours: i32) -> String {
    (now + Duration::hours(offset_hours as i64))
        .format(DATACAD_FORMAT)
        .to_string()
}

/// Hora local actual (por defecto Brasília, UTC-3)
pub fn local_timestamp(offset_hours: i32) -> String {
    format_local_timestamp(Utc::now(), offset_hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_brasilia_offset() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 2, 30, 0).unwrap();
        assert_eq!(format_local_timestamp(now, -3), "2024-12-31 23:30:00");
    }
}
