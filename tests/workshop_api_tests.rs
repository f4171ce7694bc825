use std::time::Duration;
use workshop_sim::core::config::MAX_SERVICE_DURATION;
use workshop_sim::{
    run_presets, run_simulation, ClockMode, ConcurrencyMode, DurationPolicy, IncidentRecord,
    RunSource, SimulationConfig, StopReason, VehicleRecord, WorkshopError, WorkshopRecords,
};

fn incident(id: u32, specialty: &str, estimate: Option<u64>) -> IncidentRecord {
    IncidentRecord {
        id,
        description: format!("{} repair", specialty),
        specialty: specialty.to_string(),
        estimated_duration: estimate,
    }
}

fn vehicle(id: u32, priority: bool, incidents: Vec<IncidentRecord>) -> VehicleRecord {
    VehicleRecord {
        id,
        plate: format!("{:04}-BCD", id),
        priority,
        incidents,
    }
}

/// A small store: two mechanics on the roster (one off duty), three cars
fn sample_records() -> WorkshopRecords {
    let mut records = WorkshopRecords::new();
    records
        .add_mechanic(1, "Ana", "mechanical", true)
        .add_mechanic(2, "Luis", "electrical", true)
        .add_mechanic(3, "Marta", "bodywork", false)
        .add_vehicle(vehicle(10, false, vec![incident(1, "mechanical", Some(5))]))
        .add_vehicle(vehicle(
            11,
            true,
            vec![incident(2, "electrical", Some(2)), incident(3, "bodywork", Some(3))],
        ))
        .add_vehicle(vehicle(12, false, vec![incident(4, "mechanical", Some(1))]));
    records
}

#[test]
fn test_records_mode_runs_against_current_store() {
    let records = sample_records();
    let before = records.clone();

    let report = run_simulation(RunSource::Records(&records), &SimulationConfig::default()).unwrap();
    let stats = &report.statistics;

    assert_eq!(stats.total_vehicles, 3);
    assert_eq!(stats.attended_vehicles, 3);
    assert_eq!(stats.efficiency(), 100.0);
    assert_eq!(stats.priority_vehicles_serviced, 1);
    assert_eq!(stats.priority_vehicles_attended, 1);
    // Marta is off duty, so the bodywork incident needs a hire.
    assert_eq!(report.initial_roster, 2);
    assert_eq!(stats.mechanics_hired, 1);
    assert_eq!(report.final_pool_size, 3);
    // Mechanical: 5 then 1 on the same mechanic.
    assert_eq!(report.simulated_time, 6);
    assert_eq!(stats.mean_service_duration(), Some(11.0 / 4.0));

    // Hired mechanics live only for the run.
    assert_eq!(records, before);
}

#[test]
fn test_records_mode_configuration_errors() {
    let config = SimulationConfig::default();

    let empty = WorkshopRecords::new();
    assert_eq!(
        run_simulation(RunSource::Records(&empty), &config).unwrap_err(),
        WorkshopError::NoMechanics
    );

    let mut no_vehicles = WorkshopRecords::new();
    no_vehicles.add_mechanic(1, "Ana", "mechanical", true);
    assert_eq!(
        run_simulation(RunSource::Records(&no_vehicles), &config).unwrap_err(),
        WorkshopError::NoVehicles
    );

    let mut bad_specialty = sample_records();
    bad_specialty.add_vehicle(vehicle(13, false, vec![incident(5, "tyres", None)]));
    assert_eq!(
        run_simulation(RunSource::Records(&bad_specialty), &config).unwrap_err(),
        WorkshopError::UnknownSpecialty("tyres".to_string())
    );
}

#[test]
fn test_records_mode_with_highest_mechanic_id() {
    let mut records = WorkshopRecords::new();
    records
        .add_mechanic(u32::MAX, "Ana", "mechanical", true)
        .add_vehicle(vehicle(1, false, vec![incident(1, "mechanical", Some(2))]))
        .add_vehicle(vehicle(2, false, vec![incident(2, "electrical", Some(3))]));

    let report = run_simulation(RunSource::Records(&records), &SimulationConfig::default()).unwrap();
    let stats = &report.statistics;

    // No id is left for a hire, so the electrical job can never start.
    assert_eq!(report.stop_reason, StopReason::Stalled);
    assert_eq!(stats.attended_vehicles, 1);
    assert_eq!(stats.mechanics_hired, 0);
    assert_eq!(report.final_pool_size, 1);
    assert_eq!(report.simulated_time, 2);
}

#[test]
fn test_records_mode_clamps_oversized_estimates() {
    let mut records = WorkshopRecords::new();
    records
        .add_mechanic(1, "Ana", "mechanical", true)
        .add_vehicle(vehicle(1, false, vec![incident(1, "mechanical", Some(u64::MAX))]))
        .add_vehicle(vehicle(2, false, vec![incident(2, "mechanical", Some(5))]));

    let report = run_simulation(RunSource::Records(&records), &SimulationConfig::default()).unwrap();
    let stats = &report.statistics;

    assert_eq!(report.stop_reason, StopReason::Drained);
    assert_eq!(stats.attended_vehicles, 2);
    assert_eq!(stats.service_durations, vec![MAX_SERVICE_DURATION, 5]);
    assert_eq!(report.simulated_time, MAX_SERVICE_DURATION + 5);
}

#[test]
fn test_non_finite_duration_means_are_rejected() {
    let records = sample_records();
    for durations in [
        DurationPolicy::Normal { mean: f64::INFINITY, std_dev: 1.0 },
        DurationPolicy::Exponential { mean: f64::INFINITY },
    ] {
        let config = SimulationConfig::new().with_durations(durations);
        assert!(matches!(
            run_simulation(RunSource::Records(&records), &config),
            Err(WorkshopError::InvalidConfig(_))
        ));
    }
}

#[test]
fn test_real_time_clock_completes_base_scenario() {
    let config = SimulationConfig::new()
        .with_clock(ClockMode::RealTime {
            unit: Duration::from_millis(2),
        })
        .with_durations(DurationPolicy::Fixed(2));

    let report = run_simulation(RunSource::Preset(1), &config).unwrap();
    let stats = &report.statistics;

    assert_eq!(report.stop_reason, StopReason::Drained);
    assert_eq!(stats.attended_vehicles, 8);
    assert_eq!(stats.jobs_completed(), 8);
    assert_eq!(stats.mean_service_duration(), Some(2.0));
    assert!(report.simulated_time >= 6);
    // Three back-to-back jobs of 2 units at 2ms per unit.
    assert!(report.elapsed >= Duration::from_millis(12));
}

#[test]
fn test_real_time_clock_matches_simulated_counts_for_records() {
    let records = sample_records();
    let simulated = run_simulation(RunSource::Records(&records), &SimulationConfig::default()).unwrap();
    let real_time = run_simulation(
        RunSource::Records(&records),
        &SimulationConfig::new().with_clock(ClockMode::RealTime {
            unit: Duration::from_millis(1),
        }),
    )
    .unwrap();

    assert_eq!(real_time.statistics.attended_vehicles, simulated.statistics.attended_vehicles);
    assert_eq!(real_time.statistics.mechanics_hired, simulated.statistics.mechanics_hired);
    assert_eq!(real_time.statistics.jobs_completed(), simulated.statistics.jobs_completed());
}

#[test]
fn test_real_time_clock_honours_time_limit() {
    let config = SimulationConfig::new()
        .with_clock(ClockMode::RealTime {
            unit: Duration::from_millis(5),
        })
        .with_durations(DurationPolicy::Fixed(40))
        .with_time_limit(4);

    let report = run_simulation(RunSource::Preset(1), &config).unwrap();

    assert_eq!(report.stop_reason, StopReason::TimeLimit);
    assert_eq!(report.statistics.attended_vehicles, 0);
    assert_eq!(report.statistics.efficiency(), 0.0);
    assert_eq!(report.simulated_time, 4);
}

#[test]
fn test_all_presets_in_parallel() {
    let config = SimulationConfig::new()
        .with_concurrency(ConcurrencyMode::Rayon)
        .with_thread_pool_size(3);
    let reports: Vec<_> = run_presets(&[1, 2, 3, 4, 5], &config)
        .into_iter()
        .map(|result| result.unwrap())
        .collect();

    let totals: Vec<usize> = reports.iter().map(|r| r.statistics.total_vehicles).collect();
    assert_eq!(totals, vec![8, 16, 15, 12, 10]);
    let rosters: Vec<usize> = reports.iter().map(|r| r.initial_roster).collect();
    assert_eq!(rosters, vec![3, 4, 5, 6, 7]);
    assert!(reports.iter().all(|r| r.stop_reason == StopReason::Drained));
}
