/// Implement `IntoResponse` for an askama template.
///
/// ```ignore
/// impl_axum_webpage! {
///     SearchPage,
///     status = |page| page.status,
///     content_type = "text/html; charset=utf-8",
/// }
/// ```
#[macro_export]
macro_rules! impl_axum_webpage {
    (
        $page:ty
        $(, status = $status:expr)?
        $(, content_type = $content_type:expr)?
        $(,)?
    ) => {
        impl ::axum::response::IntoResponse for $page {
            fn into_response(self) -> ::axum::response::Response {
                // set a default content type, eventually override from the page
                #[allow(unused_mut, unused_assignments)]
                let mut ct: &'static str = ::mime::TEXT_HTML_UTF_8.as_ref();
                $(
                    ct = $content_type;
                )?

                #[allow(unused_mut, unused_assignments)]
                let mut status = ::axum::http::StatusCode::OK;
                $(
                    status = {
                        let status: fn(&$page) -> ::axum::http::StatusCode = $status;
                        (status)(&self)
                    };
                )?

                match ::askama::Template::render(&self) {
                    Ok(body) => (
                        status,
                        [(::axum::http::header::CONTENT_TYPE, ct)],
                        body,
                    )
                        .into_response(),
                    Err(err) => {
                        ::tracing::error!(?err, page = stringify!($page), "failed to render template");
                        (
                            ::axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                            "internal server error",
                        )
                            .into_response()
                    }
                }
            }
        }
    };
}
