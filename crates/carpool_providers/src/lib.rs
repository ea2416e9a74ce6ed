pub mod coordinate;
pub mod duration_text;
pub mod google_maps_api;
pub mod location;
pub mod route;
pub mod routing_service;
