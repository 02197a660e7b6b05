pub mod palette;
pub mod pitch;
