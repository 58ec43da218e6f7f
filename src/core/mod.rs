//! Core mining abstractions: regions, eligibility, work lists, sessions, and
//! the scheduler that drives them.

pub mod eligibility;
pub mod error;
pub mod region;
pub mod reporter;
pub mod scheduler;
pub mod session;
pub mod work_list;
pub mod world;

pub use eligibility::{is_eligible, EligibilityPolicy, EmptyAllowList, FilterMode};
pub use error::{AppResult, MiningError};
pub use region::{normalize, Coordinate, Region, RegionCorners};
pub use reporter::{ProgressReporter, ProgressUpdate};
pub use scheduler::{Scheduler, StartOutcome, TickReport};
pub use session::{Session, SessionSnapshot, SessionStatus, SpeedLimits};
pub use work_list::{Enumeration, EnumerationStep, WorkList, WorkListBuilder};
pub use world::{CellKind, CellRemover, RemovalOutcome, WorldReader};
