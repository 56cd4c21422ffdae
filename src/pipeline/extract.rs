//! Infobox extraction from a detail page.
//!
//! Tolerant by construction: rows with unknown labels are ignored, and
//! a page with no infobox at all yields an empty field set rather than
//! an error. The one structural rule is that a row with no key cell is
//! the portrait row.

use scraper::{ElementRef, Html, Selector};

use crate::types::entity::{AttributeKind, EntityFields};
use crate::types::image::RawImage;

const ROW_SELECTOR: &str = "table.infobox#Character > tbody > tr";
const KEY_SELECTOR: &str = "th";
const VALUE_SELECTOR: &str = "td";
const IMAGE_SELECTOR: &str = "td a > img";

/// What one detail page yields: typed fields plus the raw portrait
/// descriptor, when the infobox carried one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRecord {
    pub fields: EntityFields,
    pub image: Option<RawImage>,
}

/// Extract the infobox of one detail page.
///
/// Rows are visited in document order. A keyed row whose trimmed label
/// matches one of the ten known attributes fills that field; a row with
/// zero key cells is scanned for an embedded image, and the last such
/// row wins.
pub fn extract_record(markup: &str) -> ExtractedRecord {
    let document = Html::parse_document(markup);
    let rows = Selector::parse(ROW_SELECTOR).expect("static selector");
    let keys = Selector::parse(KEY_SELECTOR).expect("static selector");
    let values = Selector::parse(VALUE_SELECTOR).expect("static selector");
    let images = Selector::parse(IMAGE_SELECTOR).expect("static selector");

    let mut record = ExtractedRecord::default();

    for row in document.select(&rows) {
        let mut key_cells = row.select(&keys).peekable();

        if key_cells.peek().is_none() {
            if let Some(image) = row.select(&images).next() {
                record.image = Some(raw_image(image));
            }
            continue;
        }

        let label: String = key_cells.flat_map(|cell| cell.text()).collect();
        let Some(kind) = AttributeKind::from_label(label.trim()) else {
            continue;
        };

        let value: String = row.select(&values).flat_map(|cell| cell.text()).collect();
        record.fields.set(kind, value.trim());
    }

    record
}

fn raw_image(element: ElementRef<'_>) -> RawImage {
    let attr = |name: &str| element.value().attr(name).map(str::to_string);
    RawImage {
        src: attr("src"),
        srcset: attr("srcset"),
        width: attr("width"),
        height: attr("height"),
    }
}
