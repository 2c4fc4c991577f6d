pub mod csv_parser;
pub mod export;
pub mod workspace_store;
