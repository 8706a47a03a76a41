//! Links between the catalog and detail views.
//!
//! Product names are the only identifier, so a detail link carries the
//! percent-encoded name in the `producto` query parameter.

use url::form_urlencoded;

pub const CATALOG_PAGE: &str = "index.html";
pub const DETAIL_PAGE: &str = "producto.html";
pub const PRODUCT_PARAM: &str = "producto";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Catalog,
    Product(String),
}

impl Route {
    pub fn href(&self) -> String {
        match self {
            Route::Catalog => CATALOG_PAGE.to_string(),
            Route::Product(name) => {
                format!("{DETAIL_PAGE}?{PRODUCT_PARAM}={}", encode_component(name))
            }
        }
    }

    /// Read a link or bare query string. A missing or empty `producto`
    /// parameter routes to the catalog.
    pub fn parse(link: &str) -> Route {
        let query = match link.split_once('?') {
            Some((_, q)) => q,
            None => link,
        };
        let query = query.split('#').next().unwrap_or("");

        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == PRODUCT_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|name| !name.is_empty())
            .map(Route::Product)
            .unwrap_or(Route::Catalog)
    }
}

/// Percent-encode a value the way browsers encode URI components
/// (spaces become `%20`, not `+`).
pub fn encode_component(value: &str) -> String {
    // `byte_serialize` escapes a literal '+' as %2B, so every '+' left is a space.
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
