//! Controladores: cada uno agrupa las operaciones de un área de la API

pub mod draft_controller;
pub mod file_controller;
pub mod order_controller;
pub mod reference_controller;
pub mod settings_controller;
