fn main() {
    if let Err(err) = pass_timeline::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
