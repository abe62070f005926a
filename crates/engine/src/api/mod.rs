pub mod routes;
pub mod handlers;
pub mod server;

pub use routes::create_router;
pub use server::{serve, start_server};
