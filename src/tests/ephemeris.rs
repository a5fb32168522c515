use rstest::*;

use crate::{
    prelude::{Config, Ephemeris, EphemerisStore, Error, RawEphemeris},
    tests::{ephemerides, gps, gps_ephemeris, init_logger, REFERENCE_TOE_S},
};

#[fixture]
fn nominal() -> Ephemeris {
    let mut eph = gps_ephemeris(gps(1), -2.9, -0.3176, 0.005912, 1.0E-4);
    eph.omega_rad = 0.6722;
    eph
}

fn raw(eph: &Ephemeris) -> RawEphemeris {
    RawEphemeris {
        sv: eph.sv,
        epoch: eph.epoch,
        toe: Some(eph.toe_s),
        toc: Some(eph.toc_s),
        sqrt_a: Some(eph.sqrt_a),
        e: Some(eph.eccentricity),
        m0: Some(eph.m0_rad),
        omega: Some(eph.omega_rad),
        i0: Some(eph.i0_rad),
        omega0: Some(eph.omega0_rad),
        delta_n: Some(eph.dn_rad_s),
        i_dot: Some(eph.idot_rad_s),
        omega_dot: Some(eph.omega_dot_rad_s),
        cuc: Some(eph.cus_cuc_rad.1),
        cus: Some(eph.cus_cuc_rad.0),
        crc: Some(eph.crs_crc_m.1),
        crs: Some(eph.crs_crc_m.0),
        cic: Some(eph.cis_cic_rad.1),
        cis: Some(eph.cis_cic_rad.0),
        a0: Some(eph.clock_polynomials.0),
        a1: Some(eph.clock_polynomials.1),
        a2: Some(eph.clock_polynomials.2),
        tgd: Some(eph.tgd_s),
    }
}

#[rstest]
fn orbital_radius_at_toe(nominal: Ephemeris) {
    init_logger();
    let cfg = Config::default();

    let state = nominal
        .satellite_state(REFERENCE_TOE_S, &cfg)
        .expect("nominal frame should resolve");

    let radius_km = state.position_m.norm() / 1.0E3;
    assert!(
        (26_000.0..26_600.0).contains(&radius_km),
        "geocentric distance {}km",
        radius_km
    );

    assert_eq!(state.t_k_s, 0.0);
    assert!((state.clock_bias_s - state.relativistic_s - 1.0E-4).abs() < 1.0E-15);
    assert!(state.relativistic_s.abs() < 1.0E-7);
}

#[rstest]
fn orbital_radius_across_validity(nominal: Ephemeris) {
    let cfg = Config::default();
    for dt in [-14400.0, -7200.0, -600.0, 600.0, 7200.0, 14400.0] {
        let state = nominal
            .satellite_state(REFERENCE_TOE_S + dt, &cfg)
            .expect("nominal frame should resolve");
        let radius_km = state.position_m.norm() / 1.0E3;
        assert!(
            (26_000.0..26_800.0).contains(&radius_km),
            "dt={} geocentric distance {}km",
            dt,
            radius_km
        );
    }
}

#[rstest]
fn week_rollover_propagation(nominal: Ephemeris) {
    let cfg = Config::default();

    let mut late = nominal;
    late.toe_s = 1.0;
    late.toc_s = 1.0;

    // 1s prior rollover is 2s ahead of this frame
    let state = late.satellite_state(604_799.0, &cfg).unwrap();
    assert!((state.t_k_s + 2.0).abs() < 1.0E-9, "t_k={}", state.t_k_s);
}

#[rstest]
#[case("sqrt_a", |eph: &mut Ephemeris| eph.sqrt_a = -1.0)]
#[case("e", |eph: &mut Ephemeris| eph.eccentricity = 1.0)]
#[case("m0", |eph: &mut Ephemeris| eph.m0_rad = f64::NAN)]
#[case("toe", |eph: &mut Ephemeris| eph.toe_s = 604_800.0)]
#[case("a1", |eph: &mut Ephemeris| eph.clock_polynomials.1 = f64::INFINITY)]
fn invalid_frame(nominal: Ephemeris, #[case] field: &str, #[case] corrupt: fn(&mut Ephemeris)) {
    let mut eph = nominal;
    corrupt(&mut eph);

    match eph.satellite_state(REFERENCE_TOE_S, &Config::default()) {
        Err(Error::EphemerisInvalid(sv, name)) => {
            assert_eq!(sv, eph.sv);
            assert_eq!(name, field);
        },
        other => panic!("expected invalid ephemeris, got {:?}", other),
    }
}

#[rstest]
fn raw_ephemeris_decoding(nominal: Ephemeris) {
    let eph = Ephemeris::try_from(raw(&nominal)).unwrap();
    assert_eq!(eph, nominal);

    let mut missing_tgd = raw(&nominal);
    missing_tgd.tgd = None;
    let eph = Ephemeris::try_from(missing_tgd).unwrap();
    assert_eq!(eph.tgd_s, 0.0);

    let mut missing_cic = raw(&nominal);
    missing_cic.cic = None;
    assert_eq!(
        Ephemeris::try_from(missing_cic),
        Err(Error::EphemerisInvalid(nominal.sv, "cic"))
    );

    let mut bad_e = raw(&nominal);
    bad_e.e = Some(1.5);
    assert_eq!(
        Ephemeris::try_from(bad_e),
        Err(Error::EphemerisInvalid(nominal.sv, "e"))
    );
}

#[test]
fn store_skips_invalid_frames() {
    init_logger();

    let mut frames = ephemerides();

    let mut corrupt = frames[0];
    corrupt.sqrt_a = 0.0;
    frames.push(corrupt);

    let mut second = frames[1];
    second.toe_s += 7200.0;
    second.toc_s += 7200.0;
    frames.push(second);

    let store = EphemerisStore::from_records(frames);

    assert_eq!(store.len(), 7);
    assert_eq!(store.satellites().count(), 6);
    assert_eq!(store.records(gps(4)).len(), 1);
    assert_eq!(store.records(gps(7)).len(), 2);
    assert!(store.records(gps(30)).is_empty());
    assert!(!store.is_empty());

    let cfg = Config::default();

    let eph = store.select(gps(7), REFERENCE_TOE_S + 5000.0, &cfg).unwrap();
    assert_eq!(eph.toe_s, REFERENCE_TOE_S + 7200.0);

    let eph = store.select(gps(7), REFERENCE_TOE_S + 3000.0, &cfg).unwrap();
    assert_eq!(eph.toe_s, REFERENCE_TOE_S);

    assert_eq!(
        store.select(gps(30), REFERENCE_TOE_S, &cfg),
        Err(Error::EphemerisUnavailable(gps(30)))
    );

    assert_eq!(
        store.select(gps(4), REFERENCE_TOE_S + 14401.0, &cfg),
        Err(Error::EphemerisUnavailable(gps(4)))
    );

    let relaxed = cfg.with_ephemeris_validity_s(86400.0);
    assert!(store.select(gps(4), REFERENCE_TOE_S + 14401.0, &relaxed).is_ok());
}

#[test]
fn empty_store() {
    let store = EphemerisStore::default();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);

    let store: EphemerisStore = ephemerides().into_iter().collect();
    assert_eq!(store.len(), 6);
}
