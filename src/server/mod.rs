pub mod entry;
pub mod router;
pub mod routes;
