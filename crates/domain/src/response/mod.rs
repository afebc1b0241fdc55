//! Response types and inspection

mod inspector;
mod spec;

pub use inspector::{
    HeuristicImageClassifier, ImageClassifier, MIN_BASE64_LEN, ResponseInspector,
    StrictImageClassifier, extract_image_urls,
};
pub use spec::{
    ResponseState, error_message, format_duration, is_success_status, parse_body,
};
