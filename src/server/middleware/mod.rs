pub mod generate_request;
pub mod negotiate;
pub mod page_query;
pub mod request_log;

pub use generate_request::{ApiGenerateRequest, GenerateForm, GenerateRequest};
pub use negotiate::ResponseFormat;
pub use page_query::PageQuery;
pub use request_log::log_request;
