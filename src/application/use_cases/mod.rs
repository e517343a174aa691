mod ask_prompt;
mod retry_executor;

pub use ask_prompt::*;
pub use retry_executor::*;
