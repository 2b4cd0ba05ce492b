//! Modelos del sistema
//!
//! Cada modelo mapea una hoja de la planilla por nombre de columna.

pub mod customer;
pub mod flow;
pub mod opportunity;
pub mod product;
pub mod proposal;
pub mod user;

pub use customer::*;
pub use flow::*;
pub use opportunity::*;
pub use product::*;
pub use proposal::*;
pub use user::*;
