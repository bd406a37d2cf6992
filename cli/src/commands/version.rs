//! Version command

/// Run the version command.
pub fn run() {
    println!("autoinit {}", env!("CARGO_PKG_VERSION"));
}
