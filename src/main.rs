fn main() {
    if let Err(e) = explain::cli::main() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
