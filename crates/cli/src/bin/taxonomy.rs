use anyhow::Result;

fn main() -> Result<()> {
    taxonomy_cli::main_entry()
}
