use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    re_milestones::cli::run_cli(std::env::args().skip(1))
}
