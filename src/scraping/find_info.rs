use crate::parsing::token::{Tag, Token};
use crate::scraping::book_info::BookInfo;
use crate::scraping::has_class::has_class;
use crate::scraping::price_to_float::price_to_float;

/// Where the scan is relative to the element wrapping the book fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Outside,
    Inside { depth: usize },
}

/// Field the most recent tag inside the wrapper opens, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Title,
    Author,
    Price,
}

impl Field {
    fn of(tag: &Tag) -> Field {
        match tag.name.as_str() {
            "h2" if has_class(tag, "title") => Field::Title,
            "a" if has_class(tag, "contributor-name") => Field::Author,
            "span" if has_class(tag, "price") => Field::Price,
            _ => Field::None,
        }
    }
}

fn is_wrapper(tag: &Tag) -> bool {
    tag.name == "div" && (has_class(tag, "item-info") || has_class(tag, "active-price"))
}

struct ExtractorState {
    scope: Scope,
    field: Field,
    title: String,
    author: String,
}

impl ExtractorState {
    fn new() -> Self {
        ExtractorState {
            scope: Scope::Outside,
            field: Field::None,
            title: String::new(),
            author: String::new(),
        }
    }

    fn start_tag(&mut self, tag: &Tag) {
        match self.scope {
            Scope::Outside => {
                if is_wrapper(tag) {
                    self.scope = Scope::Inside { depth: 1 };
                    self.field = Field::None;
                }
            }
            Scope::Inside { depth } => {
                self.scope = Scope::Inside { depth: depth + 1 };
                self.field = Field::of(tag);
            }
        }
    }

    fn end_tag(&mut self, tag: &Tag) {
        if let Scope::Inside { depth } = self.scope {
            self.scope = if depth > 1 {
                Scope::Inside { depth: depth - 1 }
            } else {
                Scope::Outside
            };
            self.field = Field::of(tag);
        }
    }

    /// Handles a text run. Returns `Some` once price text has been seen, with the
    /// outcome of normalizing it.
    fn text(&mut self, content: &str) -> Option<Option<BookInfo>> {
        match self.field {
            Field::Title if self.title.is_empty() => {
                self.title = content.trim().to_string();
            }
            Field::Author if self.author.is_empty() => {
                self.author = content.to_string();
            }
            Field::Price => {
                let info = price_to_float(content).map(|price| BookInfo {
                    price,
                    title: std::mem::take(&mut self.title),
                    author: std::mem::take(&mut self.author),
                });
                return Some(info);
            }
            _ => {}
        }
        None
    }
}

/// Scans a token sequence for the book title, author and price.
///
/// The fields are read from inside the first `div.item-info` or
/// `div.active-price` element: the title from `h2.title`, the author from the
/// first `a.contributor-name` and the price from `span.price`. Scanning stops at
/// the first price text, so a price that cannot be read yields `None` even when
/// title and author were found. A stream without price text also yields `None`.
///
/// The wrapper is tracked by counting start and end tags, so the token source
/// must close void elements with an end tag.
pub fn find_info<I>(tokens: I) -> Option<BookInfo>
where
    I: IntoIterator<Item = Token>,
{
    let mut state = ExtractorState::new();

    for token in tokens {
        match token {
            Token::StartTag(tag) => state.start_tag(&tag),
            Token::EndTag(tag) => state.end_tag(&tag),
            Token::Text(content) => {
                if let Some(result) = state.text(&content) {
                    return result;
                }
            }
            Token::End => return None,
        }
    }

    None
}

/// Price-only variant of [`find_info`].
pub fn find_price<I>(tokens: I) -> Option<f64>
where
    I: IntoIterator<Item = Token>,
{
    find_info(tokens).map(|info| info.price)
}
