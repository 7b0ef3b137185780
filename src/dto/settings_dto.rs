use serde::{Deserialize, Serialize};

use crate::models::{PermissionAction, PermissionSet, TempFile};

// Guardar los permisos completos de un rol
#[derive(Debug, Deserialize)]
pub struct SavePermissionsRequest {
    pub permissions: PermissionSet,
}

// Invertir un permiso concreto de un rol y guardarlo
#[derive(Debug, Deserialize)]
pub struct TogglePermissionRequest {
    pub section: String,
    pub action: PermissionAction,
}

#[derive(Debug, Serialize)]
pub struct RolePermissionsResponse {
    pub role_name: String,
    pub permissions: PermissionSet,
    pub viewable_sections: usize,
    pub editable_sections: usize,
}

impl RolePermissionsResponse {
    pub fn new(role_name: String, permissions: PermissionSet) -> Self {
        Self {
            viewable_sections: permissions.viewable_sections(),
            editable_sections: permissions.editable_sections(),
            role_name,
            permissions,
        }
    }
}

// Resultado de subir un archivo temporal; cada archivo es independiente
#[derive(Debug, Serialize)]
pub struct TempFileResult {
    pub name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<TempFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
