use crate::impl_axum_webpage;
use askama::Template;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response as AxumResponse},
};
use pypi_search_database::SearchError;
use std::borrow::Cow;
use tracing::error;

#[derive(Template)]
#[template(path = "error.html")]
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AxumErrorPage {
    /// The title of the page
    pub title: &'static str,
    /// The error message, displayed as a description
    pub message: Cow<'static, str>,
    pub status: StatusCode,
}

impl_axum_webpage! {
    AxumErrorPage,
    status = |err| err.status,
}

#[derive(Debug, thiserror::Error)]
pub enum AxumNope {
    #[error("Requested resource not found")]
    ResourceNotFound,
    #[error("bad request")]
    BadRequest(anyhow::Error),
    #[error("the metadata store is unavailable")]
    StoreUnavailable,
    #[error("internal error")]
    InternalError(anyhow::Error),
}

impl AxumNope {
    fn into_error_info(self) -> ErrorInfo {
        match self {
            AxumNope::ResourceNotFound => ErrorInfo {
                title: "The requested resource does not exist",
                message: "no such resource".into(),
                status: StatusCode::NOT_FOUND,
            },
            AxumNope::BadRequest(source) => ErrorInfo {
                title: "Bad request",
                message: Cow::Owned(source.to_string()),
                status: StatusCode::BAD_REQUEST,
            },
            AxumNope::StoreUnavailable => ErrorInfo {
                // details were logged where the store failed
                title: "Search is temporarily unavailable",
                message: "the package database could not be reached, please try again later"
                    .into(),
                status: StatusCode::SERVICE_UNAVAILABLE,
            },
            AxumNope::InternalError(source) => {
                error!(?source, "internal server error");
                ErrorInfo {
                    title: "Internal Server Error",
                    message: Cow::Owned(source.to_string()),
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                }
            }
        }
    }
}

struct ErrorInfo {
    // For the title of the page
    pub title: &'static str,
    // The error message, displayed as a description
    pub message: Cow<'static, str>,
    // The status code of the response
    pub status: StatusCode,
}

impl IntoResponse for AxumNope {
    fn into_response(self) -> AxumResponse {
        let ErrorInfo {
            title,
            message,
            status,
        } = self.into_error_info();
        AxumErrorPage {
            title,
            message,
            status,
        }
        .into_response()
    }
}

/// `AxumNope` but generating error responses in JSON (for API).
#[derive(Debug)]
pub(crate) struct JsonAxumNope(pub AxumNope);

impl IntoResponse for JsonAxumNope {
    fn into_response(self) -> AxumResponse {
        let ErrorInfo {
            title,
            message,
            status,
        } = self.0.into_error_info();
        (
            status,
            Json(serde_json::json!({
                "title": title,
                "message": message,
            })),
        )
            .into_response()
    }
}

impl From<AxumNope> for JsonAxumNope {
    fn from(err: AxumNope) -> Self {
        JsonAxumNope(err)
    }
}

impl From<SearchError> for JsonAxumNope {
    fn from(err: SearchError) -> Self {
        JsonAxumNope(err.into())
    }
}

impl From<anyhow::Error> for AxumNope {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<AxumNope>() {
            Ok(axum_nope) => axum_nope,
            Err(err) => AxumNope::InternalError(err),
        }
    }
}

impl From<SearchError> for AxumNope {
    fn from(err: SearchError) -> Self {
        match err {
            err @ SearchError::InvalidOrder(_) => AxumNope::BadRequest(err.into()),
            SearchError::StoreUnavailable(_) => AxumNope::StoreUnavailable,
        }
    }
}

pub(crate) type AxumResult<T> = Result<T, AxumNope>;
pub(crate) type JsonAxumResult<T> = Result<T, JsonAxumNope>;
