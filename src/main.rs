fn main() {
    if let Err(err) = csv_semantics::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
