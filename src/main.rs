use std::process::ExitCode;

fn main() -> ExitCode {
    planlint::run()
}
