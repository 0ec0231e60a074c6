use serde::{Deserialize, Serialize};
use url::form_urlencoded;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    Recent,
    PriceAsc,
    PriceDesc,
}

impl SortOption {
    pub const ALL: [SortOption; 3] = [Self::Recent, Self::PriceAsc, Self::PriceDesc];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Recent => "Most Recent",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
        }
    }

    /// Unrecognized values degrade to [`SortOption::Recent`].
    pub fn from_param(raw: &str) -> Self {
        match raw.trim() {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            _ => Self::Recent,
        }
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortChoice {
    pub value: SortOption,
    pub label: &'static str,
}

pub fn sort_options() -> Vec<SortChoice> {
    SortOption::ALL
        .into_iter()
        .map(|value| SortChoice {
            value,
            label: value.label(),
        })
        .collect()
}

/// The (search, sort, page, limit) tuple that fully determines a view.
///
/// Values are never mutated in place; every user action derives a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryParams {
    pub search: String,
    pub sort: SortOption,
    pub page: u32,
    pub limit: u32,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: SortOption::Recent,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl QueryParams {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            ..Self::default()
        }
    }

    pub fn with_search(&self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            page: DEFAULT_PAGE,
            ..self.clone()
        }
    }

    pub fn with_sort(&self, sort: SortOption) -> Self {
        Self {
            sort,
            page: DEFAULT_PAGE,
            ..self.clone()
        }
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(DEFAULT_PAGE),
            ..self.clone()
        }
    }

    /// Address-bar form. Parameters equal to their defaults are omitted so
    /// shared links stay minimal.
    pub fn to_query_string(&self) -> String {
        self.to_query_string_with_default_limit(DEFAULT_LIMIT)
    }

    /// Like [`QueryParams::to_query_string`], but `limit` is omitted only
    /// when it equals `default_limit`. Readers that fill a missing limit with
    /// a configured page size must write with the same value.
    pub fn to_query_string_with_default_limit(&self, default_limit: u32) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if !self.search.is_empty() {
            serializer.append_pair("search", &self.search);
        }
        if self.sort != SortOption::Recent {
            serializer.append_pair("sort", self.sort.as_str());
        }
        if self.page != DEFAULT_PAGE {
            serializer.append_pair("page", &self.page.to_string());
        }
        if self.limit != default_limit {
            serializer.append_pair("limit", &self.limit.to_string());
        }
        serializer.finish()
    }

    /// Inverse of [`QueryParams::to_query_string`]. Accepts a leading `?`,
    /// applies defaults for missing parameters and coerces invalid ones.
    pub fn from_query_string(raw: &str) -> Self {
        RawQueryParams::from_query_string(raw).normalize()
    }

    /// Fully spelled-out pairs for the query boundary request.
    pub fn request_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("search", self.search.clone()),
            ("sort", self.sort.as_str().to_string()),
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

/// Query parameters exactly as they arrive from an address or a request,
/// before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQueryParams {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl RawQueryParams {
    pub fn from_query_string(raw: &str) -> Self {
        let raw = raw.trim().trim_start_matches('?');
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "search" => &mut params.search,
                "sort" => &mut params.sort,
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };
            // first occurrence wins
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// Coerces every field to the nearest valid value so the query engine
    /// only ever sees `page >= 1` and `limit >= 1`.
    pub fn normalize(self) -> QueryParams {
        QueryParams {
            search: self.search.unwrap_or_default(),
            sort: self
                .sort
                .as_deref()
                .map(SortOption::from_param)
                .unwrap_or_default(),
            page: positive_or(self.page.as_deref(), DEFAULT_PAGE),
            limit: positive_or(self.limit.as_deref(), DEFAULT_LIMIT),
        }
    }
}

fn positive_or(raw: Option<&str>, default: u32) -> u32 {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return default;
    };
    match raw.parse::<i64>() {
        Ok(value) if value >= 1 => u32::try_from(value).unwrap_or(u32::MAX),
        _ => default,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub total_pages: usize,
}

impl<T> PaginatedResult<T> {
    pub fn empty(params: &QueryParams) -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: params.page,
            limit: params.limit,
            total_pages: 0,
        }
    }

    pub fn has_next_page(&self) -> bool {
        (self.page as usize) < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > DEFAULT_PAGE
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
