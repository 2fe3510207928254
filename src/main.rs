fn main() {
    if let Err(e) = event_search::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
