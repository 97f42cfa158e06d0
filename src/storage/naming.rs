// squish/src/storage/naming.rs
use crate::core::OutputFormat;
use uuid::Uuid;

// Derived artifacts are named `{base}_{8-hex-id}{ext}`. An explicit target
// format replaces the extension; collisions are as unlikely as a uuid prefix
// collision, which is negligible at the file counts this service sees.
pub fn generate_unique_filename(original_name: &str, format: Option<OutputFormat>) -> String {
    let (base, extension) = split_name(original_name);

    let extension = match format {
        Some(format) => format!(".{}", format.extension()),
        None => extension
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default(),
    };

    let id = Uuid::new_v4().simple().to_string();

    format!("{}_{}{}", base, &id[..8], extension)
}

// Splits on the last dot, treating leading-dot names like `.config` as
// extensionless, the same way the usual splitext routines do.
fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => (base, Some(ext)),
        _ => (name, None),
    }
}
