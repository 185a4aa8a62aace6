pub mod error_handler;

pub use error_handler::{error_body, handle_domain_error, handle_validation_errors};
