//! Categories command implementation

use anyhow::Result;
use pagecraft_core::types::categories as category_list;

/// Print the category list served by `GET /categories`
pub fn categories(json: bool) -> Result<()> {
    let list = category_list();

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    for category in list {
        println!("{:>2}  {:<22} {}", category.id, category.title, category.image);
    }
    Ok(())
}
