pub mod analysis;
pub mod offer;
pub mod request;
pub mod restriction;
pub mod route;
