//! ER descriptions: `Entity {` ... `}` blocks and `||--o{` relationship lines.

use super::{ConvertError, ConvertOptions, attribute_pattern, parse_attribute};
use crate::notation::{MANY_TO_ONE, NotationDocument, ONE_TO_MANY, Relationship};

pub fn convert(
    description: &str,
    options: &ConvertOptions,
) -> Result<NotationDocument, ConvertError> {
    options.check(description)?;
    let attribute_re = attribute_pattern()?;

    let mut doc = NotationDocument::new();
    let mut current: Option<String> = None;

    for line in description.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(name) = line.strip_suffix('{').filter(|_| !line.contains(ONE_TO_MANY)) {
            let name = name.trim();
            doc.open_entity(name);
            // A nameless block is written out but takes no attributes.
            current = Some(name.to_string()).filter(|n| !n.is_empty());
        } else if line == "}" {
            doc.close_entity();
            current = None;
        } else if current.is_some() && attribute_re.is_match(line) {
            if let Some(attr) = parse_attribute(line) {
                doc.attribute(attr);
            }
        } else if line.contains(ONE_TO_MANY) || line.contains(MANY_TO_ONE) {
            match parse_relationship(line, &options.default_label) {
                Some(rel) => doc.relationship(rel),
                None => log::debug!("dropping unparsed relationship: {line}"),
            }
        } else {
            log::debug!("dropping line: {line}");
        }
    }

    Ok(doc)
}

/// Parse `Left ||--o{ Right : "label"`. Lines with the mirrored token or with
/// more than one `||--o{` are not parsed.
fn parse_relationship(line: &str, default_label: &str) -> Option<Relationship> {
    let mut sides = line.split(ONE_TO_MANY);
    let left = sides.next()?.trim();
    let right = sides.next()?.trim();
    if sides.next().is_some() {
        return None;
    }

    let (right, label) = match right.split_once(':') {
        Some((target, rest)) => {
            // Only the text up to a second colon counts as the label.
            let segment = rest.split_once(':').map_or(rest, |(first, _)| first);
            let label = if segment.is_empty() {
                default_label.to_string()
            } else {
                segment.replace('"', "").trim().to_string()
            };
            (target.trim(), label)
        }
        None => (right, default_label.to_string()),
    };

    Some(Relationship {
        left: left.to_string(),
        right: right.to_string(),
        label,
    })
}
