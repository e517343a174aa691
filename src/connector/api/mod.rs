pub mod container;
pub mod controller;
pub mod router;

pub use container::{Container, ContainerConfig};
pub use controller::{AskController, AskParams, ErrorBody, DEFAULT_REQUEST_MODEL};
pub use router::{bind, build_router, serve, ASK_PATH};
