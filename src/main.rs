fn main() {
    if let Err(e) = healthdesk::run() {
        eprintln!("healthdesk: {e}");
        std::process::exit(1);
    }
}
