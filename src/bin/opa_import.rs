use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    oversight_import::cli::run_opa_import(std::env::args().skip(1))
}
