pub mod fetch_page;
pub mod generate_random_delay;
