pub mod book_info;
pub mod find_info;
pub mod has_class;
pub mod price_to_float;
