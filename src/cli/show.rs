//! Single item details.

use clap::Args;

use super::common::{print_json, CatalogArgs, CliError, CliResult};
use crate::constants::DEFAULT_LOCALE;
use crate::display::{plain_price, rating_stars};

/// Show one item by id or slug
#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    /// Item id or slug
    #[arg(value_name = "ID")]
    pub id: String,

    #[command(flatten)]
    pub source: CatalogArgs,

    /// Display locale
    #[arg(long, default_value = DEFAULT_LOCALE)]
    pub locale: String,

    /// Output the full item record as JSON
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    /// Execute the show command
    pub fn execute(&self) -> CliResult<()> {
        let catalog = self.source.load()?;
        let item = catalog
            .find(&self.id)
            .ok_or_else(|| CliError::validation(format!("Item '{}' not found", self.id)))?;

        if self.json {
            return print_json(item);
        }

        let category = item
            .category
            .as_ref()
            .map_or_else(
                || "Uncategorized".to_string(),
                |key| {
                    catalog
                        .category(key)
                        .map_or_else(|| key.to_string(), |c| c.label(&self.locale).to_string())
                },
            );

        println!("{}", item.title(&self.locale));
        println!();
        println!("  Id:        {}", item.id);
        println!("  Category:  {category}");
        println!("  Price:     {}", plain_price(item.price));
        println!("  Rating:    {} ({:.1})", rating_stars(item.rating), item.rating);
        println!("  In stock:  {}", if item.in_stock { "yes" } else { "no" });
        if item.featured {
            println!("  Featured");
        }
        if let Some(roast) = item.roast_level {
            println!("  Roast:     {roast}");
        }
        if let Some(origin) = &item.origin {
            println!("  Origin:    {origin}");
        }
        if let Some(description) = item.description.display(&self.locale) {
            println!();
            println!("{description}");
        }

        Ok(())
    }
}
