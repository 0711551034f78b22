pub mod location;
pub mod place;
pub mod user;

pub use location::Location;
pub use place::{NewPlace, Place};
pub use user::User;
