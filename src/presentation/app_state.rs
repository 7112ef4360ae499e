// Application state for HTTP handlers
use crate::application::robot_store::RobotStore;
use crate::application::simulation_scheduler::SimulationScheduler;

#[derive(Clone)]
pub struct AppState {
    pub store: RobotStore,
    pub scheduler: SimulationScheduler,
}
