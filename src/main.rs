fn main() {
    // No arguments are recognized; the task file lives in the working directory.
    if let Err(e) = todolist::tui::run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
