pub mod flight;
pub mod kit;
pub mod reference;
pub mod time;
pub mod window;

pub use flight::{FlightEventType, FlightUpdate, InFlightBatch, ProcessingBatch};
pub use kit::{KitCategory, KitSet};
pub use reference::{Airport, AircraftType, ReferenceData, ScheduleEntry};
pub use time::SimTime;
