use crate::errors::ServerError;
use crate::templates::components::error_page;
use astra::{Body, Response, ResponseBuilder};
use log::error;

/// Convert a ServerError into a proper HTML response
pub fn error_response(err: ServerError) -> Response {
    let (status, message) = match err {
        ServerError::NotFound => (404, "Página não encontrada".to_string()),
        ServerError::BadRequest(msg) => (400, msg),
        ServerError::Unauthorized(msg) => (401, msg),
        ServerError::DbError(msg) => {
            error!("database error: {msg}");
            (500, "Erro interno. Tente novamente em instantes.".to_string())
        }
        ServerError::Backend(msg) => {
            error!("backend error: {msg}");
            (502, "Serviço indisponível no momento. Tente novamente em instantes.".to_string())
        }
        ServerError::InternalError => (500, "Erro interno.".to_string()),
    };

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(error_page(status, &message).into_string()))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
