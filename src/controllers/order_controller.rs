use serde_json::{json, Value};

use crate::composer::Actor;
use crate::dto::api_response::ApiResponse;
use crate::models::Resource;
use crate::services::ReferenceService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::messages;

pub struct OrderController {
    state: AppState,
    references: ReferenceService,
}

impl OrderController {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            references: ReferenceService::from_state(state),
        }
    }

    /// `POST { action: 'delete_order', order_id, user_role, user_name }`
    pub async fn delete(&self, order_id: i64, actor: Actor) -> Result<ApiResponse<()>, AppError> {
        tracing::info!("🗑️ Eliminando pedido {} ({})", order_id, actor.user_role);
        let reply = self
            .state
            .gateway
            .post_action(json!({
                "action": "delete_order",
                "order_id": order_id,
                "user_role": actor.user_role,
                "user_name": actor.user_name,
            }))
            .await?;
        reply.into_accepted(messages::ORDER_DELETE_FAILED)?;

        self.references.invalidate(Resource::Orders).await;
        self.references.invalidate(Resource::OrderStages).await;
        Ok(ApiResponse::message(messages::ORDER_DELETED))
    }

    /// Etapas de un pedido (`?resource=order_stages&order_id=..`)
    pub async fn stages(&self, order_id: i64) -> Result<Value, AppError> {
        self.references
            .listing(Resource::OrderStages, &[("order_id", order_id.to_string())])
            .await
    }
}
