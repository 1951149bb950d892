use crate::{Config, impl_axum_webpage, page::SearchForm};
use askama::Template;
use axum::Extension;
use pypi_search_types::Order;
use std::sync::Arc;

#[derive(Template, Debug)]
#[template(path = "index.html")]
pub(crate) struct HomePage {
    form: SearchForm,
}

impl_axum_webpage! { HomePage }

pub(crate) async fn home_page(Extension(config): Extension<Arc<Config>>) -> HomePage {
    HomePage {
        form: SearchForm::new("", config.default_limit.get(), Order::default()),
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{AxumResponseTestExt as _, AxumRouterTestExt as _, TestEnvironment};
    use kuchikiki::traits::TendrilSink;

    #[tokio::test]
    async fn home_page_has_the_default_form() -> anyhow::Result<()> {
        let env = TestEnvironment::new().await?;
        let page = kuchikiki::parse_html().one(
            env.web_app()
                .assert_success("/")
                .await?
                .text()
                .await?,
        );

        let form = page.select_first("form#search-form").unwrap();
        let attrs = form.attributes.borrow();
        assert_eq!(attrs.get("action"), Some("/search/"));
        assert_eq!(attrs.get("method"), Some("get"));
        drop(attrs);

        let limit = page.select_first("input[name=limit]").unwrap();
        assert_eq!(limit.attributes.borrow().get("value"), Some("5"));

        let selected = page.select_first("select[name=order] option[selected]").unwrap();
        assert_eq!(selected.attributes.borrow().get("value"), Some("downloads"));

        let options: Vec<_> = page
            .select("select[name=order] option")
            .unwrap()
            .map(|o| o.attributes.borrow().get("value").unwrap().to_string())
            .collect();
        assert_eq!(options, ["downloads", "stars", "forks"]);

        // no sort links or results before a search
        assert!(page.select_first("#results").is_err());
        Ok(())
    }
}
