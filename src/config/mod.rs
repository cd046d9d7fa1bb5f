pub mod cli;
pub mod config;
pub mod read_url_list;
