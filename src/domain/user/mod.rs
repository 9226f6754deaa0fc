pub mod entity;
pub mod projection;

pub use entity::{Role, User, ROLE_ADMIN, ROLE_CLIENT};
pub use projection::{UserDetails, UserDetailsProjection};
