/// Rendered when no heading phrase matched anything.
pub const NOT_APPLICABLE: &str = "N/A";

const BULLET: &str = "• ";

/// Known section-heading phrases, normalized for prefix matching.
///
/// Normalization lower-cases the phrase and strips one trailing colon, so
/// `"Eligibility Criteria:"` matches a line reading `"Eligibility criteria for the fund"`.
/// Declaration order is kept: when several phrases are prefixes of the same
/// line, the first one declared wins.
#[derive(Debug, Clone)]
pub struct HeadingPhrases {
    normalized: Vec<String>,
}

impl HeadingPhrases {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized = phrases
            .into_iter()
            .map(|p| normalize(p.as_ref()))
            // an empty prefix would open a section on every line
            .filter(|p| !p.is_empty())
            .collect();
        Self { normalized }
    }

    pub fn len(&self) -> usize {
        self.normalized.len()
    }

    /// The first phrase (in declaration order) that `line` starts with.
    pub fn opening_phrase(&self, line: &str) -> Option<&str> {
        let lower = line.trim().to_lowercase();
        self.normalized
            .iter()
            .find(|p| lower.starts_with(p.as_str()))
            .map(String::as_str)
    }

    pub fn opens_section(&self, line: &str) -> bool {
        self.opening_phrase(line).is_some()
    }
}

fn normalize(phrase: &str) -> String {
    let lower = phrase.to_lowercase();
    match lower.strip_suffix(':') {
        Some(stripped) => stripped.to_string(),
        None => lower,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub body: Vec<String>,
}

impl Section {
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.body.len() + 1);
        lines.push(format!("{}{}", BULLET, self.heading));
        lines.extend(self.body.iter().cloned());
        lines.join("\n")
    }
}

/// Partition newline-separated text into heading-led sections.
///
/// Single forward pass. A section runs from its heading line until a blank
/// line (consumed) or the next heading line (left for the next section).
/// Lines outside any section are dropped.
pub fn extract_sections(text: &str, phrases: &HeadingPhrases) -> Vec<Section> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut sections = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() || !phrases.opens_section(line) {
            i += 1;
            continue;
        }

        let mut section = Section {
            heading: line.to_string(),
            body: Vec::new(),
        };
        i += 1;

        while i < lines.len() {
            let next = lines[i].trim();
            if next.is_empty() {
                i += 1;
                break;
            }
            if phrases.opens_section(next) {
                break;
            }
            section.body.push(next.to_string());
            i += 1;
        }

        sections.push(section);
    }

    sections
}

/// Render the sections of `description` for the How_To_Apply column.
pub fn how_to_apply(description: &str, phrases: &HeadingPhrases) -> String {
    let sections = extract_sections(description, phrases);
    if sections.is_empty() {
        return NOT_APPLICABLE.to_string();
    }
    sections
        .iter()
        .map(Section::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ── Tests ──
