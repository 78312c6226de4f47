fn main() {
    if let Err(err) = equipviz_lib::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
