use anyhow::Result;
use std::path::PathBuf;

pub fn run(config: Option<PathBuf>) -> Result<()> {
    let session = super::open(config)?;

    for name in session.store.ls()? {
        println!("{}", name);
    }

    Ok(())
}
