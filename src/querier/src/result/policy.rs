use crate::query::family::QueryFamily;

/// Line structure of a raw result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One `<label> => <value> @[<ts>]` association for the whole result
    SingleAssociation,
    /// One association per line
    AssociationPerLine,
    /// A label-set line followed by `<value> @[<ts>]` lines
    LabelBlocks,
}

/// Per-family knobs for [`super::ResultParser`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsePolicy {
    pub layout: Layout,
    /// Characters removed from the label side
    pub label_strip: &'static [char],
    /// Label used instead of the parsed one
    pub fixed_label: Option<&'static str>,
}

/// Characters removed from sample text, leaving `value timestamp`
pub const SAMPLE_STRIP: &[char] = &['[', ']', '@'];

const LABEL_STRIP: &[char] = &['{', '}', '[', ']', '@'];

/// Separator between a label set and its sample(s)
pub const ASSOCIATION: &str = "=>";

impl ParsePolicy {
    pub const COUNT: ParsePolicy = ParsePolicy {
        layout: Layout::SingleAssociation,
        label_strip: LABEL_STRIP,
        fixed_label: Some("count"),
    };

    pub const TOP_K_RATE: ParsePolicy = ParsePolicy {
        layout: Layout::AssociationPerLine,
        label_strip: LABEL_STRIP,
        fixed_label: None,
    };

    pub const GROUP_AVERAGE_RATE: ParsePolicy = ParsePolicy {
        layout: Layout::LabelBlocks,
        label_strip: LABEL_STRIP,
        fixed_label: None,
    };

    pub fn for_family(family: QueryFamily) -> Self {
        match family {
            QueryFamily::Count => Self::COUNT,
            QueryFamily::TopKRate => Self::TOP_K_RATE,
            QueryFamily::GroupAverageRate => Self::GROUP_AVERAGE_RATE,
        }
    }

    pub fn clean_label(&self, text: &str) -> String {
        text.replace(ASSOCIATION, "")
            .chars()
            .filter(|c| !self.label_strip.contains(c))
            .collect::<String>()
            .trim()
            .to_string()
    }
}
