use std::collections::HashSet;

use regex::Regex;

#[derive(Debug, Clone)]
pub struct FieldRules {
    anchor: Regex,
    glued_marks: Regex,
    tracking_mark: Regex,
    trailing_of: Regex,
    number_and_kind: Regex,
    description: Regex,
    commodity_code: Regex,
    gross_mass: Regex,
    numeric_token: Regex,
}

const BOILERPLATE_NUMBER: &str = "42";

impl FieldRules {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            anchor: Regex::new(r"(?i)31 Packages|Description of Goods")?,
            glued_marks: Regex::new(r"(?i)(?P<mark>1Z[A-Za-z0-9]+)(?P<label>marks)")?,
            tracking_mark: Regex::new(r"(?i)1Z[A-Za-z0-9]+")?,
            trailing_of: Regex::new(r"(?i)of$")?,
            number_and_kind: Regex::new(r"(?i)Number and kind\s*(?P<mark>\S+)")?,
            description: Regex::new(r"(?is)Description:\s*(?P<description>.+)")?,
            commodity_code: Regex::new(r"(?i)33 Commodity \(HS\) Code\s*(?P<code>[0-9]+)")?,
            gross_mass: Regex::new(
                r"(?i)35 Gross Mass \(Kg\)[A-Za-z]*\s*(?P<mass>[0-9]+\.[0-9]+)",
            )?,
            numeric_token: Regex::new(r"[0-9,.]+")?,
        })
    }

    pub fn is_anchor_row(&self, cells: &[String]) -> bool {
        cells.iter().any(|cell| self.anchor.is_match(cell))
    }

    pub fn normalize_marks<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> String {
        let joined = lines
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .filter(|line| line.trim().to_lowercase() != "marks")
            .collect::<Vec<&str>>()
            .join(" ");

        self.glued_marks
            .replace_all(joined.trim(), "${mark} Marks")
            .into_owned()
    }

    pub fn parse_marks_and_description(&self, text: &str) -> (String, String) {
        let container_mark = if let Some(found) = self.tracking_mark.find(text) {
            self.trailing_of
                .replace(found.as_str().trim(), "")
                .trim()
                .to_string()
        } else {
            self.number_and_kind
                .captures(text)
                .and_then(|captures| captures.name("mark"))
                .map(|value| value.as_str().trim().to_string())
                .unwrap_or_default()
        };

        let description = self
            .description
            .captures(text)
            .and_then(|captures| captures.name("description"))
            .map(|value| value.as_str().trim().to_string())
            .unwrap_or_default();

        (container_mark, description)
    }

    pub fn parse_commodity_and_gross_mass(&self, text: &str) -> (String, String) {
        let commodity_code = self
            .commodity_code
            .captures(text)
            .and_then(|captures| captures.name("code"))
            .map(|value| strip_code_suffix(value.as_str()).to_string())
            .unwrap_or_default();

        let gross_mass = self
            .gross_mass
            .captures(text)
            .and_then(|captures| captures.name("mass"))
            .map(|value| value.as_str().to_string())
            .unwrap_or_default();

        (commodity_code, gross_mass)
    }

    pub fn numeric_tokens(&self, text: &str) -> Vec<String> {
        let text = text.replace('\n', " ");
        self.numeric_token
            .find_iter(&text)
            .map(|found| found.as_str())
            .filter(|token| digits_only(token) != BOILERPLATE_NUMBER)
            .map(ToOwned::to_owned)
            .collect()
    }

    pub fn item_price(
        &self,
        price_text: &str,
        commodity_text: &str,
        excluded: &HashSet<&str>,
    ) -> String {
        if let Some(price) = self.numeric_tokens(price_text).pop() {
            return price;
        }

        self.numeric_tokens(&format!("{commodity_text} {price_text}"))
            .into_iter()
            .rev()
            .find(|token| !excluded.contains(token.as_str()))
            .unwrap_or_default()
    }
}

pub fn strip_code_suffix(raw: &str) -> &str {
    raw.char_indices()
        .rev()
        .nth(1)
        .map_or(raw, |(index, _)| &raw[..index])
}

fn digits_only(token: &str) -> String {
    token
        .chars()
        .filter(|character| *character != ',' && *character != '.')
        .collect()
}
