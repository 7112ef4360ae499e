// Application layer - Simulation, aggregation and event routing
pub mod envelope_poller;
pub mod event_dispatcher;
pub mod generators;
pub mod robot_store;
pub mod simulation_engine;
pub mod simulation_scheduler;
