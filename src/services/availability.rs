//! Motor de disponibilidad de vehículos
//!
//! Funciones puras sobre un snapshot de la colección de reservas que el
//! caller ya trajo a memoria. Ninguna hace I/O ni muta sus argumentos.
//!
//! Hay dos reglas de conflicto distintas y es deliberado:
//! - el check de un solo día (`is_available`) solo considera reservas
//!   aprobadas, porque alimenta vistas de estado;
//! - el check de rango (`is_available_for_range`) valida reservas nuevas o
//!   editadas, y además bloquea con las pendientes sin revisar para acotar
//!   la ventana de doble reserva mientras esperan al admin.
//!
//! Una reserva con booking_status = true y rejection_reason a la vez queda
//! fuera del check de rango (el rechazo corta primero) pero bloquea el check
//! de un solo día. La discrepancia viene del diseño original y se conserva
//! tal cual; ver DESIGN.md.

use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

use crate::models::booking::Booking;
use crate::models::vehicle::Vehicle;
use crate::utils::dates::days_inclusive;

/// Tope por defecto de la búsqueda hacia adelante de `next_available_date`
pub const MAX_DAYS_TO_CHECK: u32 = 90;

/// ¿Está el vehículo libre en un día concreto?
///
/// Solo las reservas aprobadas bloquean; pendientes y rechazadas nunca.
/// Los extremos del rango de la reserva cuentan como ocupados.
pub fn is_available(vehicle: &Vehicle, date: NaiveDate, bookings: &[Booking]) -> bool {
    if vehicle.maintenance_status {
        return false;
    }

    let conflict = bookings.iter().any(|b| {
        b.vehicle_id() == vehicle.id
            && b.booking_status
            && b.booking_date <= date
            && date <= b.return_date
    });

    !conflict
}

/// ¿Puede asignarse el vehículo a `[start, end]` completo?
///
/// El solape es inclusivo en ambos extremos: una reserva que termina el día
/// N y una solicitud que empieza el día N entran en conflicto (no hay medio
/// día de margen para la rotación de llaves).
pub fn is_available_for_range(
    vehicle: &Vehicle,
    start: NaiveDate,
    end: NaiveDate,
    bookings: &[Booking],
) -> bool {
    if vehicle.maintenance_status {
        return false;
    }

    let conflict = bookings.iter().any(|b| {
        b.vehicle_id() == vehicle.id
            && conflicts_with_range(b)
            && start <= b.return_date
            && b.booking_date <= end
    });

    !conflict
}

/// Regla de elegibilidad de conflicto para el check de rango, en orden:
/// 1. rechazada -> libera el vehículo, nunca bloquea
/// 2. aprobada -> bloquea siempre
/// 3. revisada pero ni aprobada ni rechazada (approved_by presente,
///    alcanzable por ciertas secuencias de updates) -> no bloquea
/// 4. pendiente sin revisar -> bloquea provisionalmente
fn conflicts_with_range(booking: &Booking) -> bool {
    if booking.rejection_reason.is_some() {
        return false;
    }
    if booking.booking_status {
        return true;
    }
    if booking.approved_by.is_some() {
        return false;
    }
    true
}

/// Primer día libre a partir de `from` (inclusive), escaneando día a día.
///
/// Devuelve `None` tras `max_days` días sin hueco, o inmediatamente si el
/// vehículo está en mantenimiento: ese estado solo se levanta a mano y no
/// tiene fecha de fin conocida.
pub fn next_available_date(
    vehicle: &Vehicle,
    bookings: &[Booking],
    from: NaiveDate,
    max_days: u32,
) -> Option<NaiveDate> {
    if vehicle.maintenance_status {
        return None;
    }

    (0..max_days)
        .map(|offset| from + Duration::days(i64::from(offset)))
        .find(|day| is_available(vehicle, *day, bookings))
}

/// Días de `[start, end]` cubiertos por alguna reserva aprobada del
/// vehículo, para pintar el calendario. Cada rango se recorta a la ventana
/// antes de expandirlo día a día.
pub fn booked_dates(
    vehicle: &Vehicle,
    start: NaiveDate,
    end: NaiveDate,
    bookings: &[Booking],
) -> Vec<NaiveDate> {
    let mut days = BTreeSet::new();

    for b in bookings {
        if b.vehicle_id() != vehicle.id || !b.booking_status {
            continue;
        }

        let clipped_start = b.booking_date.max(start);
        let clipped_end = b.return_date.min(end);
        for day in days_inclusive(clipped_start, clipped_end) {
            days.insert(day);
        }
    }

    days.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::VehicleSnapshot;
    use chrono::Utc;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn vehicle(maintenance: bool) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            plate_number: "WXA 1234".to_string(),
            brand: "Toyota".to_string(),
            model: "Hiace".to_string(),
            year: 2021,
            vehicle_type: "van".to_string(),
            fuel_type: "diesel".to_string(),
            seat_capacity: 5,
            maintenance_status: maintenance,
            created_at: Utc::now(),
        }
    }

    fn booking(vehicle: &Vehicle, start: NaiveDate, end: NaiveDate) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            vehicle: Json(VehicleSnapshot::from(vehicle)),
            booking_date: start,
            return_date: end,
            project: "Site survey".to_string(),
            destination: "North plant".to_string(),
            passengers: 3,
            booking_status: false,
            key_collection_status: false,
            key_return_status: false,
            rejection_reason: None,
            booked_by: Uuid::new_v4(),
            approved_by: None,
            managed_by: None,
            created_at: Utc::now(),
        }
    }

    fn approved(vehicle: &Vehicle, start: NaiveDate, end: NaiveDate) -> Booking {
        let mut b = booking(vehicle, start, end);
        b.booking_status = true;
        b.approved_by = Some(Uuid::new_v4());
        b
    }

    #[test]
    fn approved_booking_blocks_single_date_within_range() {
        let v = vehicle(false);
        let b = approved(&v, date(2024, 10, 15), date(2024, 10, 16));

        assert!(!is_available(&v, date(2024, 10, 15), &[b.clone()]));
        assert!(!is_available(&v, date(2024, 10, 16), &[b.clone()]));
        assert!(is_available(&v, date(2024, 10, 17), &[b]));
    }

    #[test]
    fn pending_booking_never_blocks_single_date() {
        let v = vehicle(false);
        let b = booking(&v, date(2024, 10, 15), date(2024, 10, 16));
        assert!(is_available(&v, date(2024, 10, 15), &[b]));
    }

    #[test]
    fn other_vehicle_booking_is_ignored() {
        let v = vehicle(false);
        let other = vehicle(false);
        let b = approved(&other, date(2024, 10, 15), date(2024, 10, 16));
        assert!(is_available(&v, date(2024, 10, 15), &[b]));
    }

    #[test]
    fn maintenance_overrides_everything() {
        let v = vehicle(true);
        assert!(!is_available(&v, date(2024, 10, 17), &[]));
        assert!(!is_available_for_range(&v, date(2024, 10, 1), date(2024, 10, 2), &[]));
        assert_eq!(next_available_date(&v, &[], date(2024, 10, 1), 90), None);
    }

    #[test]
    fn range_overlap_is_inclusive_on_both_ends() {
        // La solicitud nueva pisa el último día de la reserva aprobada
        let v = vehicle(false);
        let b = approved(&v, date(2024, 10, 15), date(2024, 10, 16));
        assert!(!is_available_for_range(&v, date(2024, 10, 16), date(2024, 10, 18), &[b]));
    }

    #[test]
    fn adjacent_same_day_turnover_counts_as_overlap() {
        // Reserva que termina el día N vs solicitud que empieza el día N
        let v = vehicle(false);
        let b = approved(&v, date(2024, 10, 10), date(2024, 10, 15));
        assert!(!is_available_for_range(&v, date(2024, 10, 15), date(2024, 10, 20), &[b.clone()]));
        // Un día después ya no hay solape
        assert!(is_available_for_range(&v, date(2024, 10, 16), date(2024, 10, 20), &[b]));
    }

    #[test]
    fn unreviewed_pending_blocks_range() {
        // Recién enviada, sin revisar
        let v = vehicle(false);
        let b = booking(&v, date(2024, 11, 1), date(2024, 11, 3));
        assert!(!is_available_for_range(&v, date(2024, 11, 2), date(2024, 11, 2), &[b]));
    }

    #[test]
    fn rejected_booking_frees_the_vehicle_for_range() {
        // Misma reserva, ahora rechazada
        let v = vehicle(false);
        let mut b = booking(&v, date(2024, 11, 1), date(2024, 11, 3));
        b.rejection_reason = Some("unavailable".to_string());
        assert!(is_available_for_range(&v, date(2024, 11, 2), date(2024, 11, 2), &[b]));
    }

    #[test]
    fn reviewed_but_undecided_does_not_block_range() {
        // approved_by presente, ni aprobada ni rechazada
        let v = vehicle(false);
        let mut b = booking(&v, date(2024, 11, 1), date(2024, 11, 3));
        b.approved_by = Some(Uuid::new_v4());
        assert!(is_available_for_range(&v, date(2024, 11, 2), date(2024, 11, 2), &[b]));
    }

    #[test]
    fn approved_and_rejected_at_once_keeps_the_documented_discrepancy() {
        // El check de rango lo ignora (el rechazo corta primero), el de un
        // solo día lo cuenta como conflicto. Ambos comportamientos quedan
        // fijados para que la discrepancia no se unifique sin querer.
        let v = vehicle(false);
        let mut b = approved(&v, date(2024, 11, 1), date(2024, 11, 3));
        b.rejection_reason = Some("duplicate request".to_string());

        assert!(is_available_for_range(&v, date(2024, 11, 2), date(2024, 11, 2), &[b.clone()]));
        assert!(!is_available(&v, date(2024, 11, 2), &[b]));
    }

    #[test]
    fn range_check_is_idempotent_and_does_not_mutate_inputs() {
        let v = vehicle(false);
        let start = date(2024, 10, 16);
        let end = date(2024, 10, 18);
        let bookings = vec![approved(&v, date(2024, 10, 15), date(2024, 10, 16))];

        let first = is_available_for_range(&v, start, end, &bookings);
        let second = is_available_for_range(&v, start, end, &bookings);

        assert_eq!(first, second);
        assert_eq!(start, date(2024, 10, 16));
        assert_eq!(end, date(2024, 10, 18));
        assert_eq!(bookings[0].booking_date, date(2024, 10, 15));
    }

    #[test]
    fn next_available_date_finds_first_free_day() {
        let v = vehicle(false);
        let b = approved(&v, date(2024, 10, 15), date(2024, 10, 17));
        let next = next_available_date(&v, &[b], date(2024, 10, 15), MAX_DAYS_TO_CHECK);
        assert_eq!(next, Some(date(2024, 10, 18)));
    }

    #[test]
    fn next_available_date_is_from_itself_when_free() {
        let v = vehicle(false);
        let next = next_available_date(&v, &[], date(2024, 10, 15), MAX_DAYS_TO_CHECK);
        assert_eq!(next, Some(date(2024, 10, 15)));
    }

    #[test]
    fn next_available_date_gives_up_after_the_window() {
        // Ocupado los días 0..=89; el día 90 quedaría libre
        // pero cae fuera de la ventana de 90 días que empieza en el día 0.
        let v = vehicle(false);
        let day0 = date(2024, 10, 1);
        let b = approved(&v, day0, day0 + Duration::days(89));
        assert_eq!(next_available_date(&v, &[b], day0, 90), None);
    }

    #[test]
    fn next_available_date_window_boundary_hit() {
        // Con un día menos de ocupación:
        // el día 89 relativo es el último que entra en la ventana.
        let v = vehicle(false);
        let day0 = date(2024, 10, 1);
        let b = approved(&v, day0, day0 + Duration::days(88));
        assert_eq!(
            next_available_date(&v, &[b], day0, 90),
            Some(day0 + Duration::days(89))
        );
    }

    #[test]
    fn booked_dates_clips_to_the_query_window() {
        let v = vehicle(false);
        let b = approved(&v, date(2024, 10, 14), date(2024, 10, 20));
        let days = booked_dates(&v, date(2024, 10, 16), date(2024, 10, 18), &[b]);
        assert_eq!(
            days,
            vec![date(2024, 10, 16), date(2024, 10, 17), date(2024, 10, 18)]
        );
    }

    #[test]
    fn booked_dates_ignores_pending_and_rejected() {
        // Misma elegibilidad que is_available: solo aprobadas
        let v = vehicle(false);
        let pending = booking(&v, date(2024, 10, 16), date(2024, 10, 17));
        let mut rejected = booking(&v, date(2024, 10, 16), date(2024, 10, 17));
        rejected.rejection_reason = Some("no driver".to_string());

        let days = booked_dates(&v, date(2024, 10, 15), date(2024, 10, 20), &[pending, rejected]);
        assert!(days.is_empty());
    }

    #[test]
    fn booked_dates_merges_overlapping_bookings() {
        let v = vehicle(false);
        let a = approved(&v, date(2024, 10, 15), date(2024, 10, 16));
        let b = approved(&v, date(2024, 10, 16), date(2024, 10, 17));
        let days = booked_dates(&v, date(2024, 10, 15), date(2024, 10, 17), &[a, b]);
        assert_eq!(
            days,
            vec![date(2024, 10, 15), date(2024, 10, 16), date(2024, 10, 17)]
        );
    }
}
