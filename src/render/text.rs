use super::{entry_line, Section, NO_CHANGES};

pub(super) fn format_text(header: &str, sections: &[Section]) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n{}\n", header, "=".repeat(header.chars().count())));

    if sections.is_empty() {
        output.push_str(&format!("\n{}\n", NO_CHANGES));
        return output;
    }

    for section in sections {
        output.push_str(&format!("\n{}:\n", section.category));
        for entry in &section.entries {
            let line = entry_line(entry, |number, _| format!("#{}", number));
            output.push_str(&format!("  - {}\n", line));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::sections;
    use crate::render::tests::{changelog, entry};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_layout() {
        let log = changelog(vec![
            entry("Tidy up", "Other", &[3]),
            entry("Add widgets", "Features", &[11]),
        ]);
        let output = format_text("v1...v2", &sections(&log));
        assert_eq!(
            output,
            "v1...v2\n=======\n\nFeatures:\n  - Add widgets in #11\n\nOther:\n  - Tidy up in #3\n"
        );
    }
}
