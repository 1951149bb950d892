mod search_form;
mod web_page;

pub(crate) use search_form::SearchForm;
