use crate::error::ApiResult;
use garde::Validate;
use langrec_dal::{Batch, ListingParams};
use serde::Serialize;

mod parsers;

#[derive(Debug, Clone, Default, Validate, serde::Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    /// Page number, starting from 1
    #[garde(range(min = 1))]
    page: Option<u32>,
    /// Records per page, no upper bound
    #[garde(range(min = 1))]
    page_size: Option<u32>,
    /// Case sensitive substring of name or description
    #[garde(length(max = 255))]
    search: Option<String>,
    /// Comma separated fields, prefix `-` means descending
    #[garde(length(max = 255))]
    sort: Option<String>,
}

impl Paging {
    pub fn into_listing_params(self, default_page_size: u32) -> ApiResult<ListingParams> {
        let page = i64::from(self.page.unwrap_or(1));
        let page_size = i64::from(self.page_size(default_page_size));
        let offset = (page - 1).saturating_mul(page_size);
        let mut params = ListingParams::new(offset, page_size);
        if let Some(sort) = self.sort.as_deref() {
            params = params.with_order(parsers::parse_ordering(sort)?);
        }
        if let Some(search) = self.search {
            params = params.with_filter(search);
        }

        Ok(params)
    }

    pub fn page_size(&self, default_page_size: u32) -> u32 {
        self.page_size.unwrap_or(default_page_size).max(1)
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    total_items: u64,
    total_pages: u64,
    current_page: u64,
    page_size: u64,
    items: Vec<T>,
}

impl<T> Page<T>
where
    T: Serialize,
{
    pub fn from_batch(batch: Batch<T>, page_size: u32) -> Self {
        let page_size = u64::from(page_size.max(1));
        Self {
            total_items: batch.total,
            total_pages: batch.total.div_ceil(page_size),
            current_page: batch.offset.max(0) as u64 / page_size + 1,
            page_size,
            items: batch.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(offset: i64, total: u64, rows: usize) -> Batch<u32> {
        Batch {
            offset,
            limit: 10,
            rows: (0..rows as u32).collect(),
            total,
        }
    }

    #[test]
    fn test_listing_params() {
        let paging = Paging {
            page: Some(3),
            page_size: Some(7),
            search: Some("".to_string()),
            sort: Some("-name".to_string()),
        };
        let params = paging.into_listing_params(10).unwrap();
        assert_eq!(14, params.offset);
        assert_eq!(7, params.limit);
        assert!(params.filter.is_none());
        assert_eq!(Some(vec![langrec_dal::Order::Desc("name".to_string())]), params.order);

        let params = Paging::default().into_listing_params(10).unwrap();
        assert_eq!(0, params.offset);
        assert_eq!(10, params.limit);
        assert!(params.order.is_none());

        let paging = Paging {
            page: Some(u32::MAX),
            page_size: Some(u32::MAX),
            ..Default::default()
        };
        let params = paging.into_listing_params(10).unwrap();
        assert_eq!(i64::MAX, params.offset);
    }

    #[test]
    fn test_page_from_batch() {
        let page = Page::from_batch(batch(20, 21, 1), 10);
        assert_eq!(3, page.current_page);
        assert_eq!(3, page.total_pages);
        assert_eq!(21, page.total_items);
        assert_eq!(1, page.items.len());

        let page = Page::from_batch(batch(0, 0, 0), 10);
        assert_eq!(1, page.current_page);
        assert_eq!(0, page.total_pages);

        let page = Page::from_batch(batch(0, 20, 10), 10);
        assert_eq!(2, page.total_pages);
    }

    #[test]
    fn test_paging_validation() {
        let paging = Paging {
            page: Some(0),
            ..Default::default()
        };
        assert!(paging.validate().is_err());
        let paging = Paging {
            page_size: Some(0),
            ..Default::default()
        };
        assert!(paging.validate().is_err());
        let paging = Paging {
            page_size: Some(u32::MAX),
            ..Default::default()
        };
        assert!(paging.validate().is_ok());
        assert!(Paging::default().validate().is_ok());
    }
}
