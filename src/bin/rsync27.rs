#![deny(unsafe_code)]

use std::{env, process::ExitCode};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> ExitCode {
    let code = cli::run_cli(env::args());
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}

#[cfg(test)]
mod tests {
    use cli::run_cli;

    #[test]
    fn missing_operands_is_a_failure_exit_code() {
        let code = run_cli(["rsync27".to_string()]);
        assert_ne!(code, 0);
    }
}
