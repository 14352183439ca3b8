pub mod acid;
pub mod envelope;
pub mod health;
pub mod multi_region;
pub mod pages;
pub mod transactions;
