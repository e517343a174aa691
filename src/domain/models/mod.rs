mod backend_config;
mod inference_result;
mod prompt_request;
mod retry_policy;

pub use backend_config::*;
pub use inference_result::*;
pub use prompt_request::*;
pub use retry_policy::*;
