//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    pretty_env_logger::init();
    if let Err(err) = civic_map_cli::run() {
        eprintln!("civic-map: {err}");
        std::process::exit(1);
    }
}
