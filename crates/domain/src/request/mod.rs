//! Request composition types

mod composer;
mod method;

pub use composer::{
    ComposedRequest, PlaceholderWarning, RequestComposer, compose_url, normalize_path,
    normalize_query, unresolved_placeholders,
};
pub use method::HttpMethod;
