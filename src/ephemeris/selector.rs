use crate::{prelude::Ephemeris, time::week_distance};

/// Picks the [Ephemeris] frame whose ToE is closest to `t_s`
/// (GPS seconds of week), accounting for week rollover.
/// Ties are resolved in favor of the earliest frame in the list.
/// Returns None when the closest frame lies further than `validity_s`.
pub fn select(frames: &[Ephemeris], t_s: f64, validity_s: f64) -> Option<&Ephemeris> {
    frames
        .iter()
        .filter(|eph| eph.toe_s.is_finite())
        .map(|eph| (eph, week_distance(t_s, eph.toe_s)))
        .fold(None::<(&Ephemeris, f64)>, |best, (eph, dt)| match best {
            Some((_, best_dt)) if best_dt <= dt => best,
            _ => Some((eph, dt)),
        })
        .and_then(|(eph, dt)| if dt <= validity_s { Some(eph) } else { None })
}
