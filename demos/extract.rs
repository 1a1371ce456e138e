use bank_extract_rs::{ExtractorBuilder, InputFile, detect_extractor};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let file_path: &str = if args.len() > 1 {
        &args[1]
    } else {
        println!("Using sample data from tests/fixtures/chase_credit_card.csv\n");
        "tests/fixtures/chase_credit_card.csv"
    };

    let mut input = InputFile::open(file_path)?;
    let Some(format) = detect_extractor(&mut input) else {
        println!("No known format matches {file_path}");
        return Ok(());
    };
    println!("Format: {format} (import id: {})", format.default_import_id());

    if let Some(fingerprint) = format.extractor(input).fingerprint()? {
        println!("Starting date: {}", fingerprint.starting_date);
        println!("First row hash: {}\n", fingerprint.first_row_hash);
    }

    let transactions = ExtractorBuilder::new()
        .filepath(file_path)
        .format(format)
        .extract()?;

    println!("Found {} transactions\n", transactions.len());

    for tx in &transactions {
        println!("Transaction {} ({}):", tx.lineno, tx.reversed_lineno);
        if let Some(date) = tx.date {
            println!("  Date: {date}");
        }
        if let Some(amount) = tx.amount {
            println!("  Amount: {amount}");
        }
        if let Some(desc) = &tx.desc {
            println!("  Description: {desc}");
        }
        if let Some(extra) = &tx.extra {
            println!("  Extra columns: {}", extra.len());
        }
        println!();
    }

    Ok(())
}
