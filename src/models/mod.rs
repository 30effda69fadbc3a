pub mod analysis;
pub mod appointment;
pub mod contact;
pub mod doctor;
pub mod enums;
pub mod user;

pub use analysis::*;
pub use appointment::*;
pub use contact::*;
pub use doctor::*;
pub use enums::*;
pub use user::*;
