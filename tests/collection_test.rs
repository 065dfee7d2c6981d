//! Collection tests against the on-disk JSON store.
//!
//! Each test opens a fresh store over a temporary directory, mutates the
//! collection, then opens a second store over the same directory to check what
//! a later session would see.

use shelfmark::app::{handle_event, App, CollectionStore, Event, FilterSpec, HydrationSource};
use shelfmark::domain::{BookDraft, BookPatch, LabelKind, ShelfmarkError};
use shelfmark::remote::{NoRemote, StaticBookSource};
use shelfmark::storage::{JsonFileStore, KeyValueStore, BOOKS_KEY};
use shelfmark::{initialize, Book, Config, NoticeLevel};
use tempfile::TempDir;

fn open(dir: &TempDir) -> CollectionStore {
    let mut store = CollectionStore::new(JsonFileStore::open(dir.path()).unwrap(), NoRemote);
    store.hydrate();
    store
}

fn draft(title: &str, rating: u8) -> BookDraft {
    BookDraft {
        title: title.into(),
        author: "Frank Herbert".into(),
        genre: "Sci-Fi".into(),
        rating,
        ..BookDraft::default()
    }
}

fn remote_book(id: &str, title: &str) -> Book {
    Book {
        id: id.into(),
        title: title.into(),
        author: "Remote Author".into(),
        genre: "Mystery".into(),
        rating: 0,
        categories: vec![],
        tags: vec![],
    }
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_books_survive_restart() {
    let dir = TempDir::new().unwrap();

    let mut first = open(&dir);
    let dune = first.create_book(draft("Dune", 5)).unwrap();
    first.create_book(draft("Children of Dune", 3)).unwrap();

    let second = open(&dir);
    let titles: Vec<&str> = second.books().iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Children of Dune", "Dune"]);
    assert_eq!(second.book(&dune.id), Some(&dune));
}

#[test]
fn test_labels_survive_restart_with_embedded_copies() {
    let dir = TempDir::new().unwrap();

    let mut first = open(&dir);
    let classics = first.create_category("Classics").unwrap();
    let favourite = first.create_tag("fav").unwrap();
    let book = first
        .create_book(BookDraft {
            category_ids: vec![classics.id.clone()],
            tag_ids: vec![favourite.id.clone()],
            ..draft("Moby Dick", 4)
        })
        .unwrap();

    first.update_category(&classics.id, "Old Classics").unwrap();

    let second = open(&dir);
    assert_eq!(second.categories()[0].label, "Old Classics");
    assert_eq!(second.tags(), &[favourite]);
    let stored = second.book(&book.id).unwrap();
    assert_eq!(stored.categories[0].label, "Old Classics");
}

#[test]
fn test_empty_snapshot_is_authoritative() {
    let dir = TempDir::new().unwrap();

    let mut first = open(&dir);
    let book = first.create_book(draft("Dune", 5)).unwrap();
    assert!(first.remove_book(&book.id));

    let mut second = CollectionStore::new(
        JsonFileStore::open(dir.path()).unwrap(),
        StaticBookSource::new(vec![remote_book("r1", "Remote One")]),
    );
    assert_eq!(second.hydrate(), HydrationSource::LocalSnapshot);
    assert!(second.books().is_empty());
}

#[test]
fn test_remote_books_used_when_no_snapshot() {
    let dir = TempDir::new().unwrap();

    let mut store = CollectionStore::new(
        JsonFileStore::open(dir.path()).unwrap(),
        StaticBookSource::new(vec![
            remote_book("r1", "Remote One"),
            remote_book("r2", "Remote Two"),
        ]),
    );
    assert_eq!(store.hydrate(), HydrationSource::Remote);
    assert_eq!(store.books().len(), 2);

    // Bootstrap data is not written back until the user changes something.
    let disk = JsonFileStore::open(dir.path()).unwrap();
    assert!(disk.get(BOOKS_KEY).unwrap().is_none());
}

#[test]
fn test_remote_failure_leaves_empty_collection() {
    let dir = TempDir::new().unwrap();

    let mut store = CollectionStore::new(
        JsonFileStore::open(dir.path()).unwrap(),
        StaticBookSource::failing("connection refused"),
    );
    assert_eq!(store.hydrate(), HydrationSource::Empty);
    assert!(store.books().is_empty());
}

#[test]
fn test_corrupt_snapshot_treated_as_absent() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("books.json"), "{ not json").unwrap();

    let mut store = CollectionStore::new(
        JsonFileStore::open(dir.path()).unwrap(),
        StaticBookSource::new(vec![remote_book("r1", "Remote One")]),
    );
    assert_eq!(store.hydrate(), HydrationSource::Remote);
    assert_eq!(store.books()[0].id, "r1");
}

#[test]
fn test_legacy_array_snapshot_is_read() {
    let dir = TempDir::new().unwrap();
    let legacy = serde_json::to_string(&vec![remote_book("b1", "Old Format")]).unwrap();
    std::fs::write(dir.path().join("books.json"), legacy).unwrap();

    let store = open(&dir);
    assert_eq!(store.books()[0].title, "Old Format");
}

#[test]
fn test_legacy_numeric_ids_survive_a_mutation() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("books.json"),
        r#"[{"id":1,"title":"My Book","author":"Some Author","genre":"Memoir","rating":4}]"#,
    )
    .unwrap();

    let mut first = open(&dir);
    assert_eq!(first.books().len(), 1);
    first.create_book(draft("New One", 3)).unwrap();

    let second = open(&dir);
    let titles: Vec<&str> = second.books().iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["New One", "My Book"]);
    assert_eq!(second.books()[1].id, "1");
}

// ============================================================================
// Validation and guards
// ============================================================================

#[test]
fn test_invalid_update_changes_nothing() {
    let dir = TempDir::new().unwrap();

    let mut store = open(&dir);
    let book = store.create_book(draft("Dune", 5)).unwrap();

    let result = store.update_book(
        &book.id,
        BookPatch {
            author: Some("Somebody Else".into()),
            rating: Some(9),
            ..BookPatch::default()
        },
    );
    assert!(matches!(result, Err(ShelfmarkError::Validation(_))));

    let reopened = open(&dir);
    assert_eq!(reopened.book(&book.id), Some(&book));
}

#[test]
fn test_category_delete_guard() {
    let dir = TempDir::new().unwrap();

    let mut store = open(&dir);
    let scifi = store.create_category("Sci-Fi").unwrap();
    let book = store
        .create_book(BookDraft {
            category_ids: vec![scifi.id.clone()],
            ..draft("Dune", 5)
        })
        .unwrap();

    let err = store.remove_category(&scifi.id).unwrap_err();
    assert_eq!(err.to_string(), "Category \"Sci-Fi\" is associated with a book");
    assert_eq!(store.categories().len(), 1);

    store.remove_book(&book.id);
    assert!(store.remove_category(&scifi.id).unwrap());

    let reopened = open(&dir);
    assert!(reopened.categories().is_empty());
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_title_filter_and_clear() {
    let dir = TempDir::new().unwrap();

    let mut store = open(&dir);
    for title in ["1984", "Duna", "Dune"] {
        store.create_book(draft(title, 4)).unwrap();
    }

    let matched: Vec<String> = store
        .apply_filter(FilterSpec::parse("title", "dun").unwrap())
        .iter()
        .map(|b| b.title.clone())
        .collect();
    assert_eq!(matched, vec!["Dune", "Duna"]);

    store.clear_filter();
    assert!(store.filtered_books().is_none());
    assert_eq!(store.visible_books().len(), 3);
}

#[test]
fn test_rating_filter() {
    let dir = TempDir::new().unwrap();

    let mut store = open(&dir);
    store.create_book(draft("First Book", 5)).unwrap();
    store.create_book(draft("Second Book", 3)).unwrap();
    store.create_book(draft("Third Book", 5)).unwrap();

    let matched = store.apply_filter(FilterSpec::Rating(5));
    assert_eq!(matched.len(), 2);
    assert!(matched.iter().all(|b| b.rating == 5));
}

#[test]
fn test_filter_follows_mutations() {
    let dir = TempDir::new().unwrap();

    let mut store = open(&dir);
    store.create_book(draft("Dune", 5)).unwrap();
    store.apply_filter(FilterSpec::parse("title", "dun").unwrap());

    store.create_book(draft("Dune Messiah", 4)).unwrap();
    assert_eq!(store.filtered_books().map(<[Book]>::len), Some(2));
}

// ============================================================================
// Front-end flow
// ============================================================================

#[test]
fn test_initialize_and_drive_events() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        data_dir: Some(dir.path().to_path_buf()),
        remote_enabled: false,
        ..Config::default()
    };

    let mut app: App = initialize(&config).unwrap();
    handle_event(&mut app, Event::Hydrate).unwrap();

    handle_event(&mut app, Event::OpenSettings).unwrap();
    handle_event(
        &mut app,
        Event::SubmitLabel {
            kind: LabelKind::Category,
            label: "Classics".into(),
        },
    )
    .unwrap();
    let category_id = app.collection.categories()[0].id.clone();

    handle_event(&mut app, Event::OpenForm { book_id: None }).unwrap();
    let notices = handle_event(
        &mut app,
        Event::SubmitBook(BookDraft {
            category_ids: vec![category_id.clone()],
            ..draft("Dune", 5)
        }),
    )
    .unwrap();
    assert_eq!(notices[0].level, NoticeLevel::Success);

    handle_event(&mut app, Event::OpenSettings).unwrap();
    let notices = handle_event(
        &mut app,
        Event::DeleteLabel {
            kind: LabelKind::Category,
            id: category_id,
        },
    )
    .unwrap();
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert_eq!(notices[0].title, "Careful!");

    let reopened = open(&dir);
    assert_eq!(reopened.books().len(), 1);
    assert_eq!(reopened.categories().len(), 1);
}
