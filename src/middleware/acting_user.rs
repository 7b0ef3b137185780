//! Usuario que actúa
//!
//! La consola envía el rol y el nombre del usuario en `X-User-Role` y
//! `X-User-Name` (UTF-8 o codificados en porcentaje). El gateway no aplica
//! permisos: sólo los reenvía al servicio de pedidos.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::composer::Actor;
use crate::utils::errors::AppError;
use crate::utils::messages::DEFAULT_USER_ROLE;

pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const USER_NAME_HEADER: &str = "x-user-name";

#[derive(Debug, Clone, PartialEq)]
pub struct ActingUser(pub Actor);

fn header_text(parts: &Parts, name: &str) -> Option<String> {
    let raw = std::str::from_utf8(parts.headers.get(name)?.as_bytes()).ok()?;
    let decoded = urlencoding::decode(raw)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    let trimmed = decoded.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ActingUser(Actor {
            user_role: header_text(parts, USER_ROLE_HEADER).unwrap_or_else(|| DEFAULT_USER_ROLE.to_string()),
            user_name: header_text(parts, USER_NAME_HEADER).unwrap_or_default(),
        }))
    }
}
