fn main() {
    if let Err(err) = multirep::run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
