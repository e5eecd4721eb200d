use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    IsNull,
    NotNull,
}

impl FilterOp {
    /// Whether `field.cmp(value)` satisfies this comparison
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            FilterOp::Eq => ordering == Ordering::Equal,
            FilterOp::Neq => ordering != Ordering::Equal,
            FilterOp::Gt => ordering == Ordering::Greater,
            FilterOp::Gte => ordering != Ordering::Less,
            FilterOp::Lt => ordering == Ordering::Less,
            FilterOp::Lte => ordering != Ordering::Greater,
            FilterOp::IsNull | FilterOp::NotNull => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: String,
}

impl Filter {
    /// Render as a PostgREST query parameter, e.g. `("date", "gte.2024-01-01")`
    pub fn param(&self) -> (String, String) {
        let value = match self.op {
            FilterOp::Eq => format!("eq.{}", self.value),
            FilterOp::Neq => format!("neq.{}", self.value),
            FilterOp::Gt => format!("gt.{}", self.value),
            FilterOp::Gte => format!("gte.{}", self.value),
            FilterOp::Lt => format!("lt.{}", self.value),
            FilterOp::Lte => format!("lte.{}", self.value),
            FilterOp::IsNull => "is.null".to_string(),
            FilterOp::NotNull => "not.is.null".to_string(),
        };
        (self.column.clone(), value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

/// A table-scoped read: projection, filters, ordering and limit.
///
/// ```
/// use books::remote::Query;
///
/// let query = Query::table("transactions")
///     .select("amount, category:categories(name)")
///     .eq("type", "income")
///     .gte("date", "2024-01-01")
///     .order_desc("date")
///     .limit(10);
/// assert_eq!(query.table_name(), "transactions");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    table: String,
    select: Option<String>,
    filters: Vec<Filter>,
    order: Vec<Order>,
    limit: Option<usize>,
}

impl Query {
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: name.into(),
            select: None,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Column projection, including embedded relations like `customer:customers(name)`
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = Some(columns.into());
        self
    }

    pub fn filter(mut self, column: &str, op: FilterOp, value: impl ToString) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            op,
            value: value.to_string(),
        });
        self
    }

    pub fn eq(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Eq, value)
    }

    pub fn neq(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Neq, value)
    }

    pub fn gt(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Gt, value)
    }

    pub fn gte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Gte, value)
    }

    pub fn lt(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Lt, value)
    }

    pub fn lte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Lte, value)
    }

    pub fn is_null(self, column: &str) -> Self {
        self.filter(column, FilterOp::IsNull, "")
    }

    pub fn not_null(self, column: &str) -> Self {
        self.filter(column, FilterOp::NotNull, "")
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order.push(Order {
            column: column.to_string(),
            descending: false,
        });
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order.push(Order {
            column: column.to_string(),
            descending: true,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn ordering(&self) -> &[Order] {
        &self.order
    }

    pub fn row_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Query string parameters in PostgREST syntax
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![(
            "select".to_string(),
            self.select.clone().unwrap_or_else(|| "*".to_string()),
        )];

        params.extend(self.filters.iter().map(Filter::param));

        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|o| {
                    format!(
                        "{}.{}",
                        o.column,
                        if o.descending { "desc" } else { "asc" }
                    )
                })
                .collect::<Vec<_>>()
                .join(",");
            params.push(("order".to_string(), order));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }
}
