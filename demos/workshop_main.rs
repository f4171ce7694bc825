use workshop_sim::core::scenario::PRESET_COUNT;
use workshop_sim::{
    run_presets, run_simulation, ConcurrencyMode, IncidentRecord, RunReport, RunSource,
    ScenarioPreset, SimulationConfig, VehicleRecord, WorkshopRecords,
};

fn print_report(title: &str, report: &RunReport) {
    let stats = &report.statistics;
    println!("\n📊 RESULTS - {}", title);
    println!("   Elapsed:              {:?}", report.elapsed);
    println!("   Simulated time:       {}", report.simulated_time);
    println!("   Vehicles:             {}", stats.total_vehicles);
    println!("   Vehicles attended:    {}", stats.attended_vehicles);
    println!("   Efficiency:           {:.1}%", stats.efficiency());
    println!("   Extra mechanics:      {}", stats.mechanics_hired);
    println!("   Priority vehicles:    {}", stats.priority_vehicles_serviced);
    if let Some(mean) = stats.mean_service_duration() {
        println!("   Mean service time:    {:.2}", mean);
    }
    if let Some(mean) = stats.mean_wait_time() {
        println!("   Mean wait time:       {:.2}", mean);
    }
    if stats.efficiency() < 100.0 {
        println!("   ⚠️  {} vehicle(s) left pending ({:?})", stats.pending_vehicles(), report.stop_reason);
    }
}

fn demo_records() -> WorkshopRecords {
    let mut records = WorkshopRecords::new();
    records
        .add_mechanic(1, "Ana", "mechanical", true)
        .add_mechanic(2, "Luis", "electrical", true)
        .add_mechanic(3, "Marta", "bodywork", true);
    for id in 0..6 {
        let specialty = ["mechanical", "electrical", "bodywork"][id as usize % 3];
        records.add_vehicle(VehicleRecord {
            id,
            plate: format!("{:04}-KLM", 1000 + id),
            priority: id % 4 == 0,
            incidents: vec![IncidentRecord {
                id,
                description: format!("{} check", specialty),
                specialty: specialty.to_string(),
                estimated_duration: None,
            }],
        });
    }
    records
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger without timestamps for cleaner output
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    println!("🔧 Starting Workshop Simulation");

    let config = SimulationConfig::new().with_concurrency(ConcurrencyMode::Rayon);
    let ids: Vec<u32> = (1..=PRESET_COUNT).collect();

    for (preset, result) in ScenarioPreset::all().iter().zip(run_presets(&ids, &config)) {
        let report = result?;
        println!("\n{}", "=".repeat(50));
        println!("🎯 {}", preset.name.to_uppercase());
        println!("{}", preset.description);
        print_report(&preset.name, &report);
    }

    let records = demo_records();
    let report = run_simulation(RunSource::Records(&records), &config)?;
    println!("\n{}", "=".repeat(50));
    print_report("current records", &report);

    Ok(())
}
