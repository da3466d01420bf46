//! Notification routing
//!
//! Push notifications carry a category key. The router maps it to the screen
//! that must be opened (and re-synchronized), adding the actor id where the
//! screen is scoped to the current user. Unknown categories are dropped.

use serde_json::Value;
use std::fmt;

use crate::core_types::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Incoming player applications
    PlayerRequests,
    /// Incoming president recruitment offers
    PresidentRequests,
    MyPresidentRequests,
    MyPlayerRequests,
    PaymentHistory { actor_id: UserId },
    RegistrationPaymentHistory { actor_id: UserId },
    Home,
}

impl Route {
    /// Screen key understood by the presentation layer
    pub fn screen(&self) -> &'static str {
        match self {
            Route::PlayerRequests => "transfer_player_requests",
            Route::PresidentRequests => "transfer_president_requests",
            Route::MyPresidentRequests => "transfer_my_president_requests",
            Route::MyPlayerRequests => "transfer_my_player_requests",
            Route::PaymentHistory { .. } => "president_payment_history",
            Route::RegistrationPaymentHistory { .. } => "president_registration_payment_history",
            Route::Home => "home",
        }
    }

    pub fn actor_id(&self) -> Option<&str> {
        match self {
            Route::PaymentHistory { actor_id } | Route::RegistrationPaymentHistory { actor_id } => {
                Some(actor_id.as_str())
            }
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.actor_id() {
            Some(actor_id) => write!(f, "{}?actor_id={}", self.screen(), actor_id),
            None => write!(f, "{}", self.screen()),
        }
    }
}

pub struct NotificationRouter;

impl NotificationRouter {
    pub fn route(category: &str, actor_id: &str) -> Option<Route> {
        let route = match category.trim() {
            "solicitud_jugador" => Route::PlayerRequests,
            "solicitud_presidente" => Route::PresidentRequests,
            "mis_solicitudes_presidente" => Route::MyPresidentRequests,
            "mis_solicitudes_jugador" => Route::MyPlayerRequests,
            "historial_pago_presidente" => Route::PaymentHistory {
                actor_id: actor_id.to_string(),
            },
            "historial_pago_presidente_inscripcion" => Route::RegistrationPaymentHistory {
                actor_id: actor_id.to_string(),
            },
            "home" => Route::Home,
            _ => return None,
        };
        Some(route)
    }

    /// Route a raw notification payload: category under `type`, else `category`
    pub fn route_payload(payload: &Value, actor_id: &str) -> Option<Route> {
        let category = payload
            .get("type")
            .and_then(Value::as_str)
            .or_else(|| payload.get("category").and_then(Value::as_str))?;
        Self::route(category, actor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table() {
        assert_eq!(
            NotificationRouter::route("solicitud_jugador", "u-1"),
            Some(Route::PlayerRequests)
        );
        assert_eq!(
            NotificationRouter::route("mis_solicitudes_jugador", "u-1"),
            Some(Route::MyPlayerRequests)
        );
        assert_eq!(
            NotificationRouter::route("home", "u-1"),
            Some(Route::Home)
        );
    }

    #[test]
    fn test_payment_history_is_actor_scoped() {
        let route = NotificationRouter::route("historial_pago_presidente", "u-7").unwrap();
        assert_eq!(route.actor_id(), Some("u-7"));
        assert_eq!(route.to_string(), "president_payment_history?actor_id=u-7");

        let route =
            NotificationRouter::route("historial_pago_presidente_inscripcion", "u-7").unwrap();
        assert_eq!(
            route,
            Route::RegistrationPaymentHistory {
                actor_id: "u-7".into()
            }
        );
    }

    #[test]
    fn test_unknown_category_is_ignored() {
        assert_eq!(NotificationRouter::route("promo_banner", "u-1"), None);
        assert_eq!(NotificationRouter::route("", "u-1"), None);
    }

    #[test]
    fn test_route_payload() {
        let payload = json!({ "type": "solicitud_presidente", "transfer_id": 9 });
        assert_eq!(
            NotificationRouter::route_payload(&payload, "u-1"),
            Some(Route::PresidentRequests)
        );

        let payload = json!({ "category": "mis_solicitudes_presidente" });
        assert_eq!(
            NotificationRouter::route_payload(&payload, "u-1"),
            Some(Route::MyPresidentRequests)
        );

        assert_eq!(
            NotificationRouter::route_payload(&json!({ "type": 3 }), "u-1"),
            None
        );
        assert_eq!(NotificationRouter::route_payload(&json!({}), "u-1"), None);
    }
}
