//! Limit/offset pagination for list endpoints

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

const DEFAULT_SIZE: u32 = 50;
const MAX_SIZE: u32 = 100;

/// Page query parameters (`?page=1&size=50`)
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_size() -> u32 {
    DEFAULT_SIZE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
        }
    }
}

impl PageParams {
    /// Effective page size, clamped to [1, 100]
    pub fn size(&self) -> u32 {
        self.size.clamp(1, MAX_SIZE)
    }

    /// 1-based page number
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    pub fn limit(&self) -> i64 {
        self.size() as i64
    }

    pub fn offset(&self) -> i64 {
        (self.page() as i64 - 1) * self.size() as i64
    }
}

/// One page of results plus totals
#[derive(Debug, Serialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, params: &PageParams) -> Self {
        Self {
            items,
            total,
            page: params.page(),
            size: params.size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = PageParams::default();
        assert_eq!(p.limit(), 50);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_offset_math() {
        let p = PageParams { page: 3, size: 20 };
        assert_eq!(p.limit(), 20);
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn test_size_clamped() {
        let p = PageParams {
            page: 1,
            size: 5000,
        };
        assert_eq!(p.limit(), 100);

        let p = PageParams { page: 0, size: 0 };
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 1);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_query_string_deserialize() {
        let p: PageParams = serde_json::from_str(r#"{"page": 2, "size": 10}"#).unwrap();
        assert_eq!(p.offset(), 10);

        // Missing fields fall back to defaults
        let p: PageParams = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.page(), 1);
        assert_eq!(p.size(), 50);
    }
}
