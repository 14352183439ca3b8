pub mod api;
pub mod database;
pub mod server;
pub mod service;
pub mod util;
