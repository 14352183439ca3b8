pub mod client;
pub mod connector;
pub mod rows;
pub mod statement;
