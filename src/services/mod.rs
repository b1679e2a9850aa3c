pub mod filter;
pub mod geo;
pub mod google_maps;
pub mod search_service;
