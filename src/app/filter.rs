//! Filter evaluation over the book collection.
//!
//! A [`FilterSpec`] names one field and a comparison value. Evaluation is a
//! linear scan that keeps the relative order of the collection and never
//! mutates it. [`ViewFilter`] wraps either a field filter or a fuzzy
//! multi-token search, which is what the collection store keeps as its active
//! filter.
//!
//! # Matching Rules
//!
//! | Field        | Value          | Match                                   |
//! |--------------|----------------|-----------------------------------------|
//! | `title`      | text           | case-insensitive substring              |
//! | `author`     | text           | case-insensitive substring              |
//! | `genre`      | text           | case-insensitive substring              |
//! | `rating`     | integer `0..=5`| exact equality                          |
//! | `categories` | category id    | book carries a category with that id    |
//! | `tags`       | tag id         | book carries a tag with that id         |

use crate::domain::error::{Result, ShelfmarkError};
use crate::domain::validation::{MAX_RATING, MAX_TEXT_LEN};
use crate::domain::Book;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Minimum length of a text filter value.
pub const MIN_FILTER_TEXT_LEN: usize = 3;

/// Field a filter compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Title,
    Author,
    Genre,
    Rating,
    Categories,
    Tags,
}

impl FilterField {
    /// Name used in filter input and notices.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Genre => "genre",
            Self::Rating => "rating",
            Self::Categories => "categories",
            Self::Tags => "tags",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = ShelfmarkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "genre" => Ok(Self::Genre),
            "rating" => Ok(Self::Rating),
            "categories" | "category" => Ok(Self::Categories),
            "tags" | "tag" => Ok(Self::Tags),
            other => Err(ShelfmarkError::Validation(format!(
                "unknown filter field: {other}"
            ))),
        }
    }
}

/// A single-field predicate over books.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSpec {
    Title(String),
    Author(String),
    Genre(String),
    Rating(u8),
    Category(String),
    Tag(String),
}

impl FilterSpec {
    /// Builds a filter from a field name and a raw value.
    ///
    /// Text values are trimmed and must be 3 to 50 characters long. Ratings
    /// must parse as an integer in `0..=5` (`0` selects unrated books).
    ///
    /// # Errors
    ///
    /// Returns [`ShelfmarkError::Validation`] for an unknown field or a value
    /// that does not fit it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shelfmark::app::FilterSpec;
    ///
    /// let spec = FilterSpec::parse("title", "dun")?;
    /// assert_eq!(spec, FilterSpec::Title("dun".to_string()));
    /// assert!(FilterSpec::parse("rating", "9").is_err());
    /// # Ok::<(), shelfmark::ShelfmarkError>(())
    /// ```
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        let field: FilterField = field.parse()?;
        let value = value.trim();

        match field {
            FilterField::Title => Ok(Self::Title(text_value(value)?)),
            FilterField::Author => Ok(Self::Author(text_value(value)?)),
            FilterField::Genre => Ok(Self::Genre(text_value(value)?)),
            FilterField::Rating => {
                let rating = value
                    .parse::<u8>()
                    .ok()
                    .filter(|r| *r <= MAX_RATING)
                    .ok_or_else(|| {
                        ShelfmarkError::Validation(format!(
                            "rating filter must be a number between 0 and {MAX_RATING}"
                        ))
                    })?;
                Ok(Self::Rating(rating))
            }
            FilterField::Categories => Ok(Self::Category(id_value(value)?)),
            FilterField::Tags => Ok(Self::Tag(id_value(value)?)),
        }
    }

    /// Field this filter compares against.
    #[must_use]
    pub const fn field(&self) -> FilterField {
        match self {
            Self::Title(_) => FilterField::Title,
            Self::Author(_) => FilterField::Author,
            Self::Genre(_) => FilterField::Genre,
            Self::Rating(_) => FilterField::Rating,
            Self::Category(_) => FilterField::Categories,
            Self::Tag(_) => FilterField::Tags,
        }
    }

    /// Returns `true` if `book` satisfies the predicate.
    #[must_use]
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            Self::Title(needle) => contains_ignore_case(&book.title, needle),
            Self::Author(needle) => contains_ignore_case(&book.author, needle),
            Self::Genre(needle) => contains_ignore_case(&book.genre, needle),
            Self::Rating(rating) => book.rating == *rating,
            Self::Category(id) => book.has_category(id),
            Self::Tag(id) => book.has_tag(id),
        }
    }
}

/// The filter currently narrowing the collection view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewFilter {
    /// Single-field predicate.
    Field(FilterSpec),
    /// Fuzzy search across title, author and genre.
    Search(String),
}

impl ViewFilter {
    /// Evaluates the filter against `books`, preserving their order.
    #[must_use]
    pub fn apply(&self, books: &[Book]) -> Vec<Book> {
        match self {
            Self::Field(spec) => evaluate(spec, books),
            Self::Search(query) => search(query, books),
        }
    }
}

/// Returns the books matching `spec`, in collection order.
///
/// # Example
///
/// ```rust
/// use shelfmark::app::filter::{evaluate, FilterSpec};
/// use shelfmark::domain::Book;
///
/// let book = |title: &str| Book {
///     id: title.to_string(),
///     title: title.to_string(),
///     author: "anon".into(),
///     genre: "novel".into(),
///     rating: 0,
///     categories: vec![],
///     tags: vec![],
/// };
/// let books = vec![book("Dune"), book("Duna"), book("1984")];
///
/// let found = evaluate(&FilterSpec::Title("dun".into()), &books);
/// assert_eq!(found.len(), 2);
/// ```
#[must_use]
pub fn evaluate(spec: &FilterSpec, books: &[Book]) -> Vec<Book> {
    let _span = tracing::debug_span!("evaluate_filter",
        field = %spec.field(),
        total_books = books.len()
    ).entered();

    let matched: Vec<Book> = books.iter().filter(|b| spec.matches(b)).cloned().collect();

    tracing::debug!(matched_count = matched.len(), "filter evaluated");
    matched
}

/// Fuzzy search over title, author and genre.
///
/// The query is split on whitespace; a book matches when every token fuzzy
/// matches its combined text. An empty query matches everything.
#[must_use]
pub fn search(query: &str, books: &[Book]) -> Vec<Book> {
    let _span = tracing::debug_span!("search_books",
        query_len = query.len(),
        total_books = books.len()
    ).entered();

    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if tokens.is_empty() {
        return books.to_vec();
    }

    let matcher = SkimMatcherV2::default();
    let matched: Vec<Book> = books
        .iter()
        .filter(|book| {
            let haystack = format!("{} {} {}", book.title, book.author, book.genre).to_lowercase();
            tokens
                .iter()
                .all(|token| matcher.fuzzy_match(&haystack, token).is_some())
        })
        .cloned()
        .collect();

    tracing::debug!(matched_count = matched.len(), "search applied");
    matched
}

/// Column a book list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Author,
    Genre,
    Rating,
}

impl FromStr for SortKey {
    type Err = ShelfmarkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "genre" => Ok(Self::Genre),
            "rating" => Ok(Self::Rating),
            other => Err(ShelfmarkError::Validation(format!("unknown sort key: {other}"))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Sorts `books` in place by `key`. Text columns compare case-insensitively.
///
/// The sort is stable, so books with equal keys keep their collection order.
pub fn sort_books(books: &mut [Book], key: SortKey, order: SortOrder) {
    books.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Title => cmp_ignore_case(&a.title, &b.title),
            SortKey::Author => cmp_ignore_case(&a.author, &b.author),
            SortKey::Genre => cmp_ignore_case(&a.genre, &b.genre),
            SortKey::Rating => a.rating.cmp(&b.rating),
        };
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

fn text_value(value: &str) -> Result<String> {
    let len = value.chars().count();
    if len < MIN_FILTER_TEXT_LEN {
        return Err(ShelfmarkError::Validation(format!(
            "At least {MIN_FILTER_TEXT_LEN} character(s)"
        )));
    }
    if len > MAX_TEXT_LEN {
        return Err(ShelfmarkError::Validation(format!(
            "At most {MAX_TEXT_LEN} character(s)"
        )));
    }
    Ok(value.to_string())
}

fn id_value(value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(ShelfmarkError::Validation("Please select an item".into()));
    }
    Ok(value.to_string())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Label;

    fn book(title: &str, rating: u8) -> Book {
        Book {
            id: format!("id-{title}"),
            title: title.to_string(),
            author: "Frank Herbert".into(),
            genre: "Science Fiction".into(),
            rating,
            categories: vec![],
            tags: vec![],
        }
    }

    fn titles(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.title.as_str()).collect()
    }

    #[test]
    fn title_filter_is_case_insensitive_substring() {
        let books = vec![book("Dune", 0), book("Duna", 0), book("1984", 0)];
        let found = evaluate(&FilterSpec::parse("title", "dun").unwrap(), &books);
        assert_eq!(titles(&found), vec!["Dune", "Duna"]);

        let found = evaluate(&FilterSpec::Title("DUNE".into()), &books);
        assert_eq!(titles(&found), vec!["Dune"]);
    }

    #[test]
    fn rating_filter_is_exact_and_ordered() {
        let books = vec![book("a5", 5), book("b3", 3), book("c5", 5), book("d0", 0)];
        let found = evaluate(&FilterSpec::Rating(5), &books);
        assert_eq!(titles(&found), vec!["a5", "c5"]);

        let unrated = evaluate(&FilterSpec::parse("rating", "0").unwrap(), &books);
        assert_eq!(titles(&unrated), vec!["d0"]);
    }

    #[test]
    fn category_and_tag_filters_match_by_id() {
        let classic = Label::new("Classic");
        let reread = Label::new("reread");
        let mut dune = book("Dune", 5);
        dune.categories.push(classic.clone());
        let mut kindred = book("Kindred", 4);
        kindred.tags.push(reread.clone());
        let books = vec![dune, kindred];

        let by_category = evaluate(&FilterSpec::Category(classic.id.clone()), &books);
        assert_eq!(titles(&by_category), vec!["Dune"]);

        let by_tag = evaluate(&FilterSpec::parse("tags", &reread.id).unwrap(), &books);
        assert_eq!(titles(&by_tag), vec!["Kindred"]);

        let by_label_text = evaluate(&FilterSpec::Category("Classic".into()), &books);
        assert!(by_label_text.is_empty());
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let books = vec![book("Dune", 5)];
        assert!(evaluate(&FilterSpec::Genre("poetry".into()), &books).is_empty());
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(FilterSpec::parse("publisher", "Ace").is_err());
        assert!(FilterSpec::parse("title", "du").is_err());
        assert!(FilterSpec::parse("rating", "five").is_err());
        assert!(FilterSpec::parse("rating", "6").is_err());
        assert!(FilterSpec::parse("categories", "  ").is_err());
        assert_eq!(
            FilterSpec::parse("Author", "  herb ").unwrap(),
            FilterSpec::Author("herb".into())
        );
    }

    #[test]
    fn fuzzy_search_requires_every_token() {
        let mut kindred = book("Kindred", 4);
        kindred.author = "Octavia Butler".into();
        kindred.genre = "Fiction".into();
        let books = vec![book("Dune", 5), kindred];

        assert_eq!(titles(&search("dune herbert", &books)), vec!["Dune"]);
        assert_eq!(titles(&search("butler", &books)), vec!["Kindred"]);
        assert_eq!(search("", &books).len(), 2);
        assert!(search("zzzz", &books).is_empty());
    }

    #[test]
    fn sort_is_stable_and_reversible() {
        let mut books = vec![book("beta", 3), book("Alpha", 5), book("gamma", 3)];

        sort_books(&mut books, SortKey::Title, SortOrder::Ascending);
        assert_eq!(titles(&books), vec!["Alpha", "beta", "gamma"]);

        sort_books(&mut books, SortKey::Rating, SortOrder::Descending);
        assert_eq!(titles(&books), vec!["Alpha", "beta", "gamma"]);

        sort_books(&mut books, SortKey::Rating, SortOrder::Ascending);
        assert_eq!(titles(&books), vec!["beta", "gamma", "Alpha"]);
    }
}
