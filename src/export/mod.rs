pub mod bitrate;
pub mod budget;
pub mod format;
pub mod plan;
