use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;

use ledger_rs::{
    SQLiteTransactionStore, SessionId, Transaction, TransactionStore, TransactionType,
    initialize_db,
};

/// A utility for creating a test database for the REST API server of ledger_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The session to create the sample transactions under.
    ///
    /// Leave unset for a database served in single-tenant mode.
    #[arg(long, short)]
    session_id: Option<String>,
}

const SAMPLE_TRANSACTIONS: [(&str, f64, TransactionType); 5] = [
    ("Salary", 5000.0, TransactionType::Credit),
    ("Rent", 1200.0, TransactionType::Debit),
    ("Groceries", 183.45, TransactionType::Debit),
    ("Power bill", 96.2, TransactionType::Debit),
    ("Birthday money", 50.0, TransactionType::Credit),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let session_id = args.session_id.map(SessionId::new);
    let store = SQLiteTransactionStore::new(Arc::new(Mutex::new(conn)));

    println!("Creating sample transactions...");
    for (title, amount, transaction_type) in SAMPLE_TRANSACTIONS {
        store.create(
            Transaction::build(title, transaction_type.signed_amount(amount))
                .session_id(session_id.clone()),
        )?;
    }

    println!("Success!");

    Ok(())
}
