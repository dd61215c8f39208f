use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("sb version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
