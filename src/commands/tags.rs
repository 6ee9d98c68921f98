//! Tags command - list the tag catalog

use crate::tags::Catalog;
use crate::ui::output::OutputWriter;
use crate::{TagrenError, output};

type Result<T> = std::result::Result<T, TagrenError>;

/// Execute the tags command
///
/// # Errors
/// Currently infallible; kept fallible like the other commands
pub fn execute(catalog: &Catalog, language: &str, out: &dyn OutputWriter, quiet: bool) -> Result<()> {
    if catalog.is_empty() {
        out.info("The tag catalog is empty.");
        return Ok(());
    }

    out.info(&format!("Tags ({language}):"));
    for id in catalog.ids() {
        out.write(&output::tag_line(id, catalog.describe(id, language), quiet));
    }

    Ok(())
}
