//! Roles y permisos
//!
//! Cada rol tiene, por sección de la consola, los permisos ver/crear/editar.
//! La aplicación real de los permisos la hace el servicio; aquí sólo se editan.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Secciones conocidas de la consola
pub const SECTIONS: [&str; 6] = ["orders", "drivers", "vehicles", "clients", "overview", "settings"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    View,
    Create,
    Edit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionPermissions {
    #[serde(default)]
    pub view: bool,
    #[serde(default)]
    pub create: bool,
    #[serde(default)]
    pub edit: bool,
}

impl SectionPermissions {
    fn flag_mut(&mut self, action: PermissionAction) -> &mut bool {
        match action {
            PermissionAction::View => &mut self.view,
            PermissionAction::Create => &mut self.create,
            PermissionAction::Edit => &mut self.edit,
        }
    }

    pub fn allows(&self, action: PermissionAction) -> bool {
        match action {
            PermissionAction::View => self.view,
            PermissionAction::Create => self.create,
            PermissionAction::Edit => self.edit,
        }
    }
}

/// Permisos por sección. Las secciones desconocidas se conservan tal cual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(pub BTreeMap<String, SectionPermissions>);

impl PermissionSet {
    pub fn can(&self, section: &str, action: PermissionAction) -> bool {
        self.0.get(section).map_or(false, |p| p.allows(action))
    }

    /// Invierte un permiso y devuelve el valor nuevo
    pub fn toggle(&mut self, section: &str, action: PermissionAction) -> bool {
        let flag = self
            .0
            .entry(section.to_string())
            .or_default()
            .flag_mut(action);
        *flag = !*flag;
        *flag
    }

    pub fn viewable_sections(&self) -> usize {
        self.0.values().filter(|p| p.view).count()
    }

    pub fn editable_sections(&self) -> usize {
        self.0.values().filter(|p| p.edit).count()
    }
}

/// Rol tal como lo lista el servicio (`?resource=roles`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub id: Option<i64>,
    pub role_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub permissions: PermissionSet,
}
