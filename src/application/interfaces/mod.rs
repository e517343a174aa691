mod inference_service;

pub use inference_service::*;
