use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::{common::i18n::I18nStore, db::GatewayError, middleware::i18n::Locale};

/// Alertas genéricos mostrados ao operador quando uma escrita falha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    SaveResident,
    SaveCompany,
    SavePackage,
    RegisterPickup,
    SaveReceivedItem,
    RegisterLoan,
    RegisterReturn,
    RegisterVisitor,
    RegisterExit,
    SaveEmployee,
    SaveOccurrence,
    SaveTimeRecord,
    ClearTimeRecords,
    SaveDriver,
    SaveVisit,
    Delete,
}

impl Alert {
    pub fn key(self) -> &'static str {
        match self {
            Alert::SaveResident => "alert.save_resident",
            Alert::SaveCompany => "alert.save_company",
            Alert::SavePackage => "alert.save_package",
            Alert::RegisterPickup => "alert.register_pickup",
            Alert::SaveReceivedItem => "alert.save_received_item",
            Alert::RegisterLoan => "alert.register_loan",
            Alert::RegisterReturn => "alert.register_return",
            Alert::RegisterVisitor => "alert.register_visitor",
            Alert::RegisterExit => "alert.register_exit",
            Alert::SaveEmployee => "alert.save_employee",
            Alert::SaveOccurrence => "alert.save_occurrence",
            Alert::SaveTimeRecord => "alert.save_time_record",
            Alert::ClearTimeRecords => "alert.clear_time_records",
            Alert::SaveDriver => "alert.save_driver",
            Alert::SaveVisit => "alert.save_visit",
            Alert::Delete => "alert.delete",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Falha no backend: {0}")]
    Gateway(#[from] GatewayError),

    // Escrita recusada: vira um alerta genérico para o operador.
    #[error("Falha ao gravar ({})", .0.key())]
    WriteFailed(Alert),

    #[error("Linha inválida em '{collection}': {source}")]
    RowDecode {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Registro {0} não encontrado")]
    RecordNotFound(Uuid),

    #[error("O registro já está em '{0}'")]
    AlreadyTransitioned(&'static str),

    #[error("Sessão de turno não iniciada")]
    Unauthenticated,

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro no armazenamento local: {0}")]
    LocalStore(#[from] std::io::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

/// Resposta de erro já traduzida.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let (status, key) = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| {
                            let code = e.message.as_ref().map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string());
                            Value::String(i18n.translate(lang, &format!("validation.{}", code)))
                        })
                        .collect();
                    details.insert(field.to_string(), Value::Array(messages));
                }
                return ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: i18n.translate(lang, "error.validation"),
                    details: Some(Value::Object(details)),
                };
            }
            AppError::WriteFailed(alert) => (StatusCode::BAD_GATEWAY, alert.key()),
            AppError::RecordNotFound(_) => (StatusCode::NOT_FOUND, "error.record_not_found"),
            AppError::AlreadyTransitioned(_) => (StatusCode::CONFLICT, "error.already_transitioned"),
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, "error.unauthenticated"),
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "error.internal")
            }
        };

        ApiError {
            status,
            error: i18n.translate(lang, key),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}
