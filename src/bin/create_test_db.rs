//! Creates a SQLite database seeded with a week of sample
//! transactions for manual testing of the dashboard endpoints.

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use spendsight::{NewTransaction, create_transaction, initialize_db};

/// Create a test database with sample transaction data.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path for the SQLite database to create.
    #[arg(long, default_value = "test.db")]
    db_path: String,

    /// The user ID to create transactions for.
    #[arg(long, default_value = "user_1")]
    user_id: String,
}

fn main() {
    let args = Args::parse();

    let conn = Connection::open(&args.db_path).expect("Could not open the database file.");
    initialize_db(&conn).expect("Could not initialize the database schema.");

    let now = OffsetDateTime::now_utc();
    let samples = [
        ("Salary", "1200", "income", None, 6),
        ("Groceries", "84.20", "expense", Some("food"), 5),
        ("Bus pass", "35", "expense", Some("transport"), 4),
        ("Takeaways", "28.50", "expense", Some("food"), 3),
        ("Electricity", "96", "expense", Some("utilities"), 2),
        ("Side gig", "150", "income", None, 1),
        ("Coffee", "4.50", "expense", Some("food"), 0),
    ];

    for (title, amount, kind, category, days_ago) in samples {
        create_transaction(
            NewTransaction {
                user_id: Some(args.user_id.clone()),
                title: Some(title.to_owned()),
                amount: Some(amount.to_owned()),
                kind: Some(kind.to_owned()),
                category: category.map(str::to_owned),
                date: None,
            },
            now - Duration::days(days_ago),
            &conn,
        )
        .expect("Could not insert sample transaction.");
    }

    println!(
        "Created {} with {} sample transactions for {}.",
        args.db_path,
        samples.len(),
        args.user_id
    );
}
