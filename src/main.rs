use std::process::ExitCode;

fn main() -> ExitCode {
    temp_keychain::cli::run(std::env::args_os())
}
