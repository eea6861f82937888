fn main() {
    if let Err(e) = address_tagger::cli::run() {
        if e.is_data_integrity() {
            eprintln!("Data integrity error: {} (no tag store written)", e);
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(e.exit_code());
    }
}
