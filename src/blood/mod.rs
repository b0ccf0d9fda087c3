pub mod group;
pub mod compatibility;

pub use group::BloodGroup;
pub use compatibility::is_compatible;
