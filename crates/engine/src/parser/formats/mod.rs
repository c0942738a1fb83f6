/// Line shapes recognized as the start of a new entry

pub mod level_led;
pub mod timestamped;

pub use level_led::LevelLedLine;
pub use timestamped::TimestampedLine;
