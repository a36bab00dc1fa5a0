//! Extractors that reject with a structured [`ErrorResponse`](crate::errors::ErrorResponse).

pub mod id_path;
pub mod validated_json;

pub use id_path::IdPath;
pub use validated_json::ValidatedJson;
