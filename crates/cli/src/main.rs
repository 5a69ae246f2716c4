use std::process::ExitCode;

fn main() -> ExitCode {
    shamba_cli::run()
}
