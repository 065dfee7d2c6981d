//! shelfmark - command-line front end for the book collection.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use shelfmark::app::{sort_books, FilterSpec, SortKey, SortOrder};
use shelfmark::infrastructure::get_config_path;
use shelfmark::observability::init_tracing;
use shelfmark::{
    handle_event, initialize, App, Book, BookDraft, BookPatch, Config, Event, LabelKind, Notice,
    NoticeLevel, Result, ShelfmarkError,
};

#[derive(Parser)]
#[command(name = "shelfmark")]
#[command(version, about = "Personal book-collection manager", long_about = None)]
#[command(after_help = "EXAMPLES:
    shelfmark list --sort rating --desc         List books, best rated first
    shelfmark add --title Dune --author 'Frank Herbert' --genre Sci-Fi --rating 5
    shelfmark filter title dun                  Books whose title contains \"dun\"
    shelfmark category add Classics             Create a category")]
struct Cli {
    /// Configuration file (default: platform config dir)
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Never contact the remote bootstrap endpoint
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all books
    List {
        /// Column to sort by: title, author, genre, rating
        #[arg(short, long, value_name = "KEY")]
        sort: Option<SortKey>,

        /// Sort in descending order
        #[arg(long)]
        desc: bool,
    },

    /// Add a book
    Add(AddArgs),

    /// Change fields of an existing book
    Edit(EditArgs),

    /// Delete a book
    Rm {
        /// Book id
        id: String,
    },

    /// Show one book in full
    Show {
        /// Book id
        id: String,
    },

    /// List books matching one field (title, author, genre, rating, category, tag)
    Filter {
        /// Field to filter on
        field: String,

        /// Value to match; category and tag take an id
        value: String,
    },

    /// Fuzzy search across title, author and genre
    Search {
        /// Search query
        query: String,
    },

    /// Manage categories
    Category {
        #[command(subcommand)]
        action: LabelCommand,
    },

    /// Manage tags
    Tag {
        #[command(subcommand)]
        action: LabelCommand,
    },
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    title: String,

    #[arg(long)]
    author: String,

    #[arg(long)]
    genre: String,

    /// Rating from 1 to 5
    #[arg(long)]
    rating: u8,

    /// Category id (repeatable)
    #[arg(long = "category", value_name = "ID")]
    categories: Vec<String>,

    /// Tag id (repeatable)
    #[arg(long = "tag", value_name = "ID")]
    tags: Vec<String>,
}

#[derive(Args)]
struct EditArgs {
    /// Book id
    id: String,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    author: Option<String>,

    #[arg(long)]
    genre: Option<String>,

    #[arg(long)]
    rating: Option<u8>,

    /// Replace categories with these ids (repeatable)
    #[arg(long = "category", value_name = "ID")]
    categories: Option<Vec<String>>,

    /// Replace tags with these ids (repeatable)
    #[arg(long = "tag", value_name = "ID")]
    tags: Option<Vec<String>>,

    /// Remove every category
    #[arg(long, conflicts_with = "categories")]
    clear_categories: bool,

    /// Remove every tag
    #[arg(long, conflicts_with = "tags")]
    clear_tags: bool,
}

#[derive(Subcommand)]
enum LabelCommand {
    /// List entries with their ids
    List,

    /// Create an entry
    Add {
        label: String,
    },

    /// Rename an entry
    Rename {
        id: String,
        label: String,
    },

    /// Delete an entry not used by any book
    Rm {
        id: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(get_config_path);
    let mut config = Config::load(&config_path)?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    if cli.offline {
        config.remote_enabled = false;
    }

    init_tracing(&config);
    tracing::info!(config = %config_path.display(), "shelfmark starting");

    let mut app = initialize(&config)?;
    handle_event(&mut app, Event::Hydrate)?;

    match cli.command {
        Command::List { sort, desc } => {
            let mut books = app.collection.books().to_vec();
            if let Some(key) = sort {
                let order = if desc { SortOrder::Descending } else { SortOrder::Ascending };
                sort_books(&mut books, key, order);
            }
            print_books(&books);
        }

        Command::Add(args) => {
            handle_event(&mut app, Event::OpenForm { book_id: None })?;
            let notices = handle_event(
                &mut app,
                Event::SubmitBook(BookDraft {
                    title: args.title,
                    author: args.author,
                    genre: args.genre,
                    rating: args.rating,
                    category_ids: args.categories,
                    tag_ids: args.tags,
                }),
            )?;
            print_notices(&notices);
            if let Some(book) = app.collection.books().first() {
                println!("{}", book.id);
            }
        }

        Command::Edit(args) => {
            if app.collection.book(&args.id).is_none() {
                return Err(ShelfmarkError::Validation(format!("no book with id {}", args.id)));
            }
            handle_event(&mut app, Event::OpenForm { book_id: Some(args.id) })?;
            let patch = BookPatch {
                title: args.title,
                author: args.author,
                genre: args.genre,
                rating: args.rating,
                category_ids: if args.clear_categories {
                    Some(Vec::new())
                } else {
                    args.categories
                },
                tag_ids: if args.clear_tags { Some(Vec::new()) } else { args.tags },
            };
            print_notices(&handle_event(&mut app, Event::SubmitBookPatch(patch))?);
        }

        Command::Rm { id } => {
            let notices = handle_event(&mut app, Event::DeleteBook(id.clone()))?;
            if notices.is_empty() {
                println!("No book with id {id}");
            }
            print_notices(&notices);
        }

        Command::Show { id } => match app.collection.book(&id) {
            Some(book) => print_book(book),
            None => println!("No book with id {id}"),
        },

        Command::Filter { field, value } => {
            let spec = FilterSpec::parse(&field, &value)?;
            handle_event(&mut app, Event::OpenFilter)?;
            let notices = handle_event(&mut app, Event::ApplyFilter(spec))?;
            print_matches(&app, &notices);
        }

        Command::Search { query } => {
            handle_event(&mut app, Event::OpenFilter)?;
            let notices = handle_event(&mut app, Event::Search(query))?;
            print_matches(&app, &notices);
        }

        Command::Category { action } => run_label(&mut app, LabelKind::Category, action)?,
        Command::Tag { action } => run_label(&mut app, LabelKind::Tag, action)?,
    }

    Ok(())
}

fn run_label(app: &mut App, kind: LabelKind, action: LabelCommand) -> Result<()> {
    handle_event(app, Event::OpenSettings)?;

    match action {
        LabelCommand::List => {
            for label in app.collection.labels(kind) {
                println!("{}  {}", label.id, label.label);
            }
        }
        LabelCommand::Add { label } => {
            print_notices(&handle_event(app, Event::SubmitLabel { kind, label })?);
            if let Some(created) = app.collection.labels(kind).first() {
                println!("{}", created.id);
            }
        }
        LabelCommand::Rename { id, label } => {
            if app.collection.label(kind, &id).is_none() {
                println!("No {} with id {id}", kind.as_str().to_lowercase());
                return Ok(());
            }
            handle_event(app, Event::SelectLabel { kind, id: Some(id) })?;
            print_notices(&handle_event(app, Event::SubmitLabel { kind, label })?);
        }
        LabelCommand::Rm { id } => {
            let notices = handle_event(app, Event::DeleteLabel { kind, id: id.clone() })?;
            if notices.is_empty() {
                println!("No {} with id {id}", kind.as_str().to_lowercase());
            }
            print_notices(&notices);
        }
    }

    handle_event(app, Event::Close)?;
    Ok(())
}

fn print_matches(app: &App, notices: &[Notice]) {
    if notices.is_empty() {
        if let Some(matched) = app.collection.filtered_books() {
            print_books(matched);
        }
    } else {
        print_notices(notices);
    }
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Warning => eprintln!("{notice}"),
            NoticeLevel::Success | NoticeLevel::Info => println!("{notice}"),
        }
    }
}

fn print_books(books: &[Book]) {
    if books.is_empty() {
        println!("No books yet");
        return;
    }

    println!("{:<36}  {:<30}  {:<24}  {:<14}  {}", "ID", "TITLE", "AUTHOR", "GENRE", "RATING");
    for book in books {
        println!(
            "{:<36}  {:<30}  {:<24}  {:<14}  {}",
            book.id,
            truncate(&book.title, 30),
            truncate(&book.author, 24),
            truncate(&book.genre, 14),
            stars(book),
        );
    }
}

fn print_book(book: &Book) {
    println!("ID: {}", book.id);
    println!("Title: {}", book.title);
    println!("Author: {}", book.author);
    println!("Genre: {}", book.genre);
    println!("Rating: {}", stars(book));
    if !book.categories.is_empty() {
        let names: Vec<&str> = book.categories.iter().map(|c| c.label.as_str()).collect();
        println!("Categories: {}", names.join(", "));
    }
    if !book.tags.is_empty() {
        let names: Vec<&str> = book.tags.iter().map(|t| t.label.as_str()).collect();
        println!("Tags: {}", names.join(", "));
    }
}

fn stars(book: &Book) -> String {
    if book.is_rated() {
        "*".repeat(usize::from(book.rating))
    } else {
        "-".to_string()
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
