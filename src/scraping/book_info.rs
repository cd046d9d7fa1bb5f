/// Fields scraped from one book page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookInfo {
    pub price: f64,
    pub title: String,
    pub author: String,
}
