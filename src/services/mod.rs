pub mod fact_sequence;
pub mod scheduler;

pub use fact_sequence::{FactSequence, SequenceError, SequenceStep, SessionScore};
pub use scheduler::{Scheduler, SchedulerError};
