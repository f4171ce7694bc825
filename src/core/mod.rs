pub mod batch;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod event_scheduler;
pub mod job_queue;
pub mod models;
pub mod records;
pub mod scenario;
pub mod simulation_engine;
pub mod specialty;
pub mod statistics;
pub mod types;
pub mod worker_pool;
