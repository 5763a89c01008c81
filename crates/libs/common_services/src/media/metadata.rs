use exif::{In, Reader};
use std::collections::BTreeMap;
use std::io::Cursor;
use tracing::debug;

/// Reads the primary image's EXIF tags into `tag name -> display value`, e.g. `Model -> "X-T30"`.
/// Files without readable EXIF give an empty map.
#[must_use]
pub fn extract_exif(bytes: &[u8]) -> BTreeMap<String, String> {
    let exif = match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif,
        Err(e) => {
            debug!("No EXIF data: {e}");
            return BTreeMap::new();
        }
    };

    exif.fields()
        .filter(|field| field.ifd_num == In::PRIMARY)
        .map(|field| {
            let value = field.display_value().to_string();
            (field.tag.to_string(), value.trim_matches('"').to_owned())
        })
        .collect()
}
