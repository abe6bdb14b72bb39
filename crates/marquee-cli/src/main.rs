#![forbid(unsafe_code)]

fn main() -> std::process::ExitCode {
    marquee_cli::main_entry()
}
