pub mod clock;
pub mod particles;
pub mod playback;
pub mod profile;
pub mod scheduler;
pub mod zoom;
