fn main() {
    if let Err(err) = table_spec_guess::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
