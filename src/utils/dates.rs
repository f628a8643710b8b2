//! Helpers de normalización de fechas
//!
//! Las reservas se razonan siempre en días de calendario. Todo timestamp
//! que llega del exterior se reduce aquí a un `NaiveDate` inmutable antes
//! de tocar el motor de disponibilidad; nunca se muta el valor recibido.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Reducir un timestamp UTC a su día de calendario (medianoche implícita)
pub fn normalize_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// Día de calendario actual en UTC
pub fn today() -> NaiveDate {
    normalize_day(Utc::now())
}

/// Iterar los días de `[start, end]` inclusive, en orden.
/// Devuelve un vector vacío si `start > end`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        current += Duration::days(1);
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn normalize_day_strips_time_of_day() {
        let ts = Utc.with_ymd_and_hms(2024, 10, 15, 23, 59, 59).unwrap();
        assert_eq!(
            normalize_day(ts),
            NaiveDate::from_ymd_opt(2024, 10, 15).unwrap()
        );
    }

    #[test]
    fn days_inclusive_includes_both_endpoints() {
        let start = NaiveDate::from_ymd_opt(2024, 10, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 10, 17).unwrap();
        let days = days_inclusive(start, end);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0], start);
        assert_eq!(days[2], end);
    }

    #[test]
    fn days_inclusive_single_day() {
        let day = NaiveDate::from_ymd_opt(2024, 10, 15).unwrap();
        assert_eq!(days_inclusive(day, day), vec![day]);
    }

    #[test]
    fn days_inclusive_empty_when_inverted() {
        let start = NaiveDate::from_ymd_opt(2024, 10, 17).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 10, 15).unwrap();
        assert!(days_inclusive(start, end).is_empty());
    }
}
