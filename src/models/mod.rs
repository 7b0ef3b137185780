//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos del pedido y de los datos de
//! referencia que intercambia el gateway con el servicio de pedidos.

pub mod order;
pub mod permission;
pub mod reference;
pub mod settings;
pub mod stage;

pub use order::*;
pub use permission::*;
pub use reference::*;
pub use settings::*;
pub use stage::*;
