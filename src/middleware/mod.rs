//! Middleware del sistema
//!
//! CORS para la consola y extracción del usuario que actúa.

pub mod acting_user;
pub mod cors;

pub use acting_user::*;
pub use cors::*;
