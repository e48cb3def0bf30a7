use serde::Deserialize;

use crate::config::PaginationConfig;
use crate::error::CrmError;

/// Raw `?offset=&limit=` query string.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// A validated page window: `offset >= 0`, `1 <= limit <= max_limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    offset: i64,
    limit: i64,
}

impl Page {
    pub fn new(offset: i64, limit: i64, cfg: &PaginationConfig) -> Result<Self, CrmError> {
        if offset < 0 {
            return Err(CrmError::validation("`offset` must be greater than or equal to 0"));
        }
        let max = i64::from(cfg.max_limit);
        if !(1..=max).contains(&limit) {
            return Err(CrmError::validation(format!(
                "`limit` must be between 1 and {max}"
            )));
        }
        Ok(Self { offset, limit })
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }
}

impl PageQuery {
    pub fn resolve(&self, cfg: &PaginationConfig) -> Result<Page, CrmError> {
        Page::new(
            self.offset.unwrap_or(0),
            self.limit.unwrap_or_else(|| i64::from(cfg.default_limit)),
            cfg,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_values() {
        let page = PageQuery::default()
            .resolve(&PaginationConfig::default())
            .unwrap();
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn limit_bounds() {
        let cfg = PaginationConfig::default();
        assert!(Page::new(0, 100, &cfg).is_ok());
        assert!(matches!(Page::new(0, 101, &cfg), Err(CrmError::Validation(_))));
        assert!(matches!(Page::new(0, 0, &cfg), Err(CrmError::Validation(_))));
    }

    #[test]
    fn negative_offset_is_rejected() {
        let query = PageQuery {
            offset: Some(-1),
            limit: None,
        };
        assert!(matches!(
            query.resolve(&PaginationConfig::default()),
            Err(CrmError::Validation(_))
        ));
    }
}
