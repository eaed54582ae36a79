pub mod assignment;
pub mod geo;
pub mod profile;
pub mod task;

pub use assignment::{Assignment, SessionSet};
pub use geo::GeoPoint;
pub use profile::{Profile, ProfileEdits};
pub use task::{Session, Task};
