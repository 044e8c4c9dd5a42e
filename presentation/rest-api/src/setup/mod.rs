pub mod dependency_injection;
pub mod route_table;
pub mod server;
