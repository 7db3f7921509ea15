//! Turns query strings and path segments into store filters.

use {
    crate::model::{Name, Pokemon},
    serde::{Deserialize, Serialize},
};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 20;

/// Reads an optional sign followed by leading digits, ignoring whatever trails
/// them. `None` when there are no digits or the value overflows.
pub fn parse_int(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();

    if digits == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits].parse().ok()?;

    Some(if negative { -magnitude } else { magnitude })
}

/// `?page=&limit=` exactly as it arrived.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn from_params(params: &PageParams) -> Self {
        Self {
            page: positive_or(params.page.as_deref(), DEFAULT_PAGE),
            limit: positive_or(params.limit.as_deref(), DEFAULT_LIMIT),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total_count: u64) -> u64 {
        total_count.div_ceil(self.limit)
    }
}

// Zero counts as missing, negatives clamp to 1.
fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    match raw.and_then(parse_int) {
        None | Some(0) => default,
        Some(value) if value < 1 => 1,
        Some(value) => value as u64,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub results: Vec<T>,
    pub total_count: u64,
    pub page: u64,
    pub total_pages: u64,
}

/// `?name=` exactly as it arrived.
#[derive(Debug, Default, Deserialize)]
pub struct NameParams {
    pub name: Option<String>,
}

/// Case-insensitive substring match over the english, french, japanese and
/// chinese names, any one of which may hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameQuery {
    needle: String,
}

impl NameQuery {
    /// `None` when the parameter is absent or empty.
    pub fn from_params(params: &NameParams) -> Option<Self> {
        params
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| Self {
                needle: name.to_owned(),
            })
    }

    pub fn matches(&self, name: &Name) -> bool {
        let needle = self.needle.to_lowercase();

        name.locales()
            .any(|locale| locale.to_lowercase().contains(&needle))
    }

    /// `ILIKE` pattern with the needle's own wildcards escaped.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.needle.len() + 2);

        pattern.push('%');

        for c in self.needle.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }

            pattern.push(c);
        }

        pattern.push('%');
        pattern
    }
}

/// Which document a single-document operation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Id(i64),
    Name(NameQuery),
}

impl Filter {
    pub fn matches(&self, pokemon: &Pokemon) -> bool {
        match self {
            Filter::Id(id) => pokemon.id == *id,
            Filter::Name(query) => query.matches(&pokemon.name),
        }
    }
}
