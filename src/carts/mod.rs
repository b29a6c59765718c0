pub mod dto;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use services::CartService;
