use anyhow::Result;
use clap::Subcommand;
use vfo_application::Workspace;

use super::print_json;

#[derive(Subcommand)]
pub enum CatalogAction {
    /// Show the catalog and its current total
    Show,
    /// Enable or disable an add-on
    Toggle { key: String },
}

pub fn run(ws: &Workspace, action: CatalogAction) -> Result<()> {
    let catalog = match action {
        CatalogAction::Show => ws.catalog.get()?,
        CatalogAction::Toggle { key } => ws.catalog.toggle_add_on(&key)?,
    };
    print_json(&catalog)?;
    println!("Total: {:.2}", catalog.total());
    Ok(())
}
