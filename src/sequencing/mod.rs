pub mod clock;
pub mod pattern;
pub mod scale;

pub use clock::{RowMap, StepClock};
pub use pattern::StepPattern;
pub use scale::ScaleMode;
