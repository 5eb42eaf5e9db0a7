use langrec_dal::Order;

use crate::error::{ApiError, ApiResult};

pub(super) fn parse_ordering(orderings: &str) -> ApiResult<Vec<Order>> {
    orderings
        .split(',')
        .map(|name| {
            let (field_name, descending) = match name.trim() {
                "" => return Err(ApiError::InvalidQuery("Empty ordering name".to_string())),
                name if name.len() > 100 => {
                    return Err(ApiError::InvalidQuery("Ordering name too long".to_string()))
                }
                name if name.starts_with('+') => (&name[1..], false),
                name if name.starts_with('-') => (&name[1..], true),
                name => (name, false),
            };

            let order = if descending {
                Order::Desc(field_name.to_string())
            } else {
                Order::Asc(field_name.to_string())
            };

            Ok(order)
        })
        .collect::<Result<Vec<_>, _>>()
}
