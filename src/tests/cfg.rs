use crate::{
    prelude::{BacklogPolicy, Config, EpochPipeline, ReceiverSolution},
    tests::{ephemerides, observation_epoch, store, REFERENCE_RX_S},
};

#[test]
fn default_config_from_empty_description() {
    let cfg: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.max_iterations, 10);
    assert_eq!(cfg.convergence_m, 1.0E-4);
    assert_eq!(cfg.ephemeris_validity_s, 14400.0);
    assert_eq!(cfg.min_sv, 4);
    assert_eq!(cfg.realtime.queue_capacity, 16);
}

#[test]
fn partial_config() {
    let content = r#"
    {
        "max_iterations": 20,
        "realtime": {
            "backlog": "Sequential"
        }
    }"#;

    let cfg: Config = serde_json::from_str(content).unwrap();
    assert_eq!(cfg.max_iterations, 20);
    assert_eq!(cfg.convergence_m, 1.0E-4);
    assert_eq!(cfg.realtime.backlog, BacklogPolicy::Sequential);
    assert_eq!(cfg.realtime.poll_interval_ms, 100);
}

#[test]
fn presets() {
    for cfg in [Config::static_preset(), Config::kinematic_preset()] {
        let content = serde_json::to_string_pretty(&cfg).unwrap();
        let parsed: Config = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, cfg);
    }
}

#[test]
fn receiver_solution() {
    let mut pipeline = EpochPipeline::new(&Config::default(), store());
    let epoch = observation_epoch(REFERENCE_RX_S, &ephemerides());
    let solution = pipeline.process(&epoch).unwrap();

    let content = serde_json::to_string(&solution).unwrap();
    let parsed: ReceiverSolution = serde_json::from_str(&content).unwrap();

    assert_eq!(parsed.sv, solution.sv);
    assert_eq!(parsed.epoch, solution.epoch);
    assert_eq!(parsed.iterations, solution.iterations);
}
