pub mod types;
pub mod formation;
pub mod slot_utils;
pub mod grid;
pub mod validate;
pub mod timeline;
pub mod cascade;
pub mod reshape;
pub mod state;
pub mod plan;

pub use types::{CellFlags, Half, PlayerAggregate, SlotKey, SlotTime};
pub use grid::AssignmentGrid;
pub use validate::{evaluate, Evaluation};
pub use timeline::{build_timeline, timeline_lines, TimelineEvent};
pub use cascade::{cascade, CascadeMode};
pub use reshape::reshape;
pub use state::PlanState;
pub use plan::{Plan, PlanReport};
pub use slot_utils::{format_minutes, slot_times};
