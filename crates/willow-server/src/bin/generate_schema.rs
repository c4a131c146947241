use willow_server::generate_schema;

fn main() -> anyhow::Result<()> {
    println!("{}", generate_schema()?);
    Ok(())
}
