pub mod api;
mod dtos;
pub(crate) mod errors;
mod health_handler;
mod todos_handler;
