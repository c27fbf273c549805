//! Table query builder — equality filters and ordering.
//!
//! Renders to the REST layer's query-string dialect: `select=*`,
//! `column=eq.value`, `order=column.desc`.

/// Sort direction for a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A query against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: String,
    filters: Vec<(String, String)>,
    order: Option<Order>,
}

impl Query {
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self { table: name.into(), filters: Vec::new(), order: None }
    }

    /// Keep rows whose `column` equals `value`.
    #[must_use]
    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((column.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order { column: column.into(), ascending });
        self
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    #[cfg(test)]
    #[must_use]
    pub fn filters(&self) -> &[(String, String)] {
        &self.filters
    }

    #[cfg(test)]
    #[must_use]
    pub fn ordering(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    /// Query parameters for a read: projection, filters, then ordering.
    #[must_use]
    pub fn select_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_owned(), "*".to_owned())];
        params.extend(self.filter_params());
        if let Some(order) = &self.order {
            let dir = if order.ascending { "asc" } else { "desc" };
            params.push(("order".to_owned(), format!("{}.{dir}", order.column)));
        }
        params
    }

    /// Query parameters for a write: filters only.
    #[must_use]
    pub fn filter_params(&self) -> Vec<(String, String)> {
        self.filters
            .iter()
            .map(|(column, value)| (column.clone(), format!("eq.{value}")))
            .collect()
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
