pub mod core_logic;
pub mod phases_types;
pub mod run;

pub use core_logic::{plan_trip, solve_leg};
pub use phases_types::*;
