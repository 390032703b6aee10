//! ---
//! cbs_section: "08-calculation-engine"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Breaker sizing pipeline and standard tables."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
#[cfg(feature = "rest-api")]
pub use rest::{router, router_with_config};

#[cfg(feature = "rest-api")]
mod rest {
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use cbs_common::EngineConfig;
    use std::sync::Arc;

    use crate::{
        errors::CalcEngineError, model::BreakerCalculationInput, orchestrator::BreakerCalculator,
        results::CalculationResults,
    };

    use super::ErrorBody;

    #[derive(Clone, Default)]
    pub struct CalcEngineState {
        calculator: BreakerCalculator,
    }

    pub fn router() -> Router {
        router_with_config(EngineConfig::default())
    }

    pub fn router_with_config(config: EngineConfig) -> Router {
        Router::new()
            .route("/api/calc/breaker", post(breaker))
            .with_state(Arc::new(CalcEngineState {
                calculator: BreakerCalculator::new(config),
            }))
    }

    async fn breaker(
        State(state): State<Arc<CalcEngineState>>,
        Json(payload): Json<BreakerCalculationInput>,
    ) -> Result<Json<CalculationResults>, (StatusCode, Json<ErrorBody>)> {
        state.calculator.calculate(&payload).map(Json).map_err(map_err)
    }

    fn map_err(err: CalcEngineError) -> (StatusCode, Json<ErrorBody>) {
        let status = if err.is_input_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(ErrorBody::from(&err)))
    }
}

/// Error payload returned by the REST endpoint.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alerts: Vec<crate::results::CalculationAlert>,
}

impl From<&crate::errors::CalcEngineError> for ErrorBody {
    fn from(err: &crate::errors::CalcEngineError) -> Self {
        use crate::errors::CalcEngineError;

        let (violations, alerts) = match err {
            CalcEngineError::InvalidInput { violations } => (violations.clone(), Vec::new()),
            CalcEngineError::CapacityExceeded { alerts, .. } => (Vec::new(), alerts.clone()),
            _ => (Vec::new(), Vec::new()),
        };
        Self {
            error: err.to_string(),
            violations,
            alerts,
        }
    }
}
