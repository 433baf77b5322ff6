//! Sorting and pagination over the record snapshot.
//!
//! The table never talks to the backend: it orders and slices whatever
//! records the controller currently holds.

use crate::types::Taxpayer;
use std::cmp::Ordering;
use std::fmt::Write as _;

/// Page sizes offered to the user
pub const ROWS_PER_PAGE_OPTIONS: [usize; 5] = [10, 15, 20, 25, 30];

/// Page size used until the user picks another
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

/// Shown in place of rows when there are none
pub const EMPTY_TABLE_MESSAGE: &str = "There are no records to display";

/// A table column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    /// Taxpayer ID
    Tid,
    /// Given name
    FirstName,
    /// Family name
    LastName,
    /// Postal address
    Address,
}

impl Column {
    /// All columns, in display order
    pub const ALL: [Self; 4] = [Self::Tid, Self::FirstName, Self::LastName, Self::Address];

    /// Column header text
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Tid => "TID",
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Address => "Address",
        }
    }

    /// Cell text for `taxpayer`
    #[must_use]
    pub fn cell(self, taxpayer: &Taxpayer) -> String {
        match self {
            Self::Tid => taxpayer.tid.to_string(),
            Self::FirstName => taxpayer.first_name.clone(),
            Self::LastName => taxpayer.last_name.clone(),
            Self::Address => taxpayer.address.clone(),
        }
    }

    fn compare(self, a: &Taxpayer, b: &Taxpayer) -> Ordering {
        match self {
            Self::Tid => a.tid.cmp(&b.tid),
            Self::FirstName => a.first_name.cmp(&b.first_name),
            Self::LastName => a.last_name.cmp(&b.last_name),
            Self::Address => a.address.cmp(&b.address),
        }
    }
}

/// Sort direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    #[must_use]
    const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    const fn indicator(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// The active sort: which column, which way
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SortOrder {
    /// Sorted column
    pub column: Column,
    /// Direction
    pub direction: SortDirection,
}

/// User-controlled table settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableState {
    sort: Option<SortOrder>,
    page: usize,
    rows_per_page: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self::with_rows_per_page(DEFAULT_ROWS_PER_PAGE)
    }
}

impl TableState {
    /// Unsorted table on page 1 showing `rows_per_page` rows
    ///
    /// Zero falls back to [`DEFAULT_ROWS_PER_PAGE`].
    #[must_use]
    pub const fn with_rows_per_page(rows_per_page: usize) -> Self {
        Self {
            sort: None,
            page: 1,
            rows_per_page: if rows_per_page == 0 {
                DEFAULT_ROWS_PER_PAGE
            } else {
                rows_per_page
            },
        }
    }

    /// Active sort, if any
    #[must_use]
    pub const fn sort(&self) -> Option<SortOrder> {
        self.sort
    }

    /// Current 1-based page
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Rows shown per page
    #[must_use]
    pub const fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// Sort by `column`: ascending first, toggling on repeated clicks
    ///
    /// Returns to page 1.
    pub fn sort_by(&mut self, column: Column) {
        let direction = match self.sort {
            Some(current) if current.column == column => current.direction.flipped(),
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortOrder { column, direction });
        self.reset_page();
    }

    /// Jump to `page`, clamped to the pages `total_rows` fill
    pub fn go_to_page(&mut self, page: usize, total_rows: usize) {
        self.page = page.clamp(1, self.page_count(total_rows));
    }

    /// Change the page size and return to page 1
    ///
    /// Returns `false` and changes nothing if `rows_per_page` is zero.
    pub fn set_rows_per_page(&mut self, rows_per_page: usize) -> bool {
        if rows_per_page == 0 {
            return false;
        }
        self.rows_per_page = rows_per_page;
        self.page = 1;
        true
    }

    /// Back to page 1, for when the record set is replaced
    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    /// Number of pages `total_rows` fill; at least one
    #[must_use]
    pub const fn page_count(&self, total_rows: usize) -> usize {
        if total_rows == 0 {
            1
        } else {
            total_rows.div_ceil(self.rows_per_page)
        }
    }

    /// Sort `records` and cut out the current page
    #[must_use]
    pub fn view(&self, records: &[Taxpayer]) -> TablePage {
        let mut rows = records.to_vec();
        if let Some(order) = self.sort {
            // sort_by is stable, so equal keys keep backend order in both directions
            match order.direction {
                SortDirection::Ascending => rows.sort_by(|a, b| order.column.compare(a, b)),
                SortDirection::Descending => rows.sort_by(|a, b| order.column.compare(b, a)),
            }
        }

        let total_rows = rows.len();
        let page_count = self.page_count(total_rows);
        let page = self.page.clamp(1, page_count);
        let start = (page - 1) * self.rows_per_page;
        let rows = rows.into_iter().skip(start).take(self.rows_per_page).collect();

        TablePage {
            rows,
            sort: self.sort,
            page,
            page_count,
            rows_per_page: self.rows_per_page,
            rows_per_page_options: &ROWS_PER_PAGE_OPTIONS,
            total_rows,
        }
    }
}

/// One rendered page of the table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TablePage {
    /// Rows on this page, in display order
    pub rows: Vec<Taxpayer>,
    /// Active sort
    pub sort: Option<SortOrder>,
    /// 1-based page number
    pub page: usize,
    /// Total number of pages
    pub page_count: usize,
    /// Page size
    pub rows_per_page: usize,
    /// Page sizes the user can pick from
    pub rows_per_page_options: &'static [usize],
    /// Rows across all pages
    pub total_rows: usize,
}

impl TablePage {
    /// Header labels, with an arrow on the sorted column
    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        Column::ALL
            .iter()
            .map(|&column| match self.sort {
                Some(order) if order.column == column => {
                    format!("{} {}", column.header(), order.direction.indicator())
                },
                _ => column.header().to_string(),
            })
            .collect()
    }

    /// Cell text of every row on this page
    #[must_use]
    pub fn cells(&self) -> Vec<[String; 4]> {
        self.rows
            .iter()
            .map(|row| Column::ALL.map(|column| column.cell(row)))
            .collect()
    }

    /// Range summary like `11-20 of 42`
    #[must_use]
    pub fn range_label(&self) -> String {
        if self.total_rows == 0 {
            return "0-0 of 0".to_string();
        }
        let first = (self.page - 1) * self.rows_per_page + 1;
        let last = first + self.rows.len() - 1;
        format!("{first}-{last} of {}", self.total_rows)
    }

    /// Plain-text grid of this page, with a pagination footer
    #[must_use]
    pub fn render_text(&self) -> String {
        let headers = self.headers();
        let cells = self.cells();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        push_row(&mut out, &headers, &widths);
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        push_row(&mut out, &rule, &widths);

        if cells.is_empty() {
            out.push_str(EMPTY_TABLE_MESSAGE);
            out.push('\n');
        }
        for row in &cells {
            push_row(&mut out, row, &widths);
        }

        let _ = writeln!(
            out,
            "Rows per page: {}  {}  Page {}/{}",
            self.rows_per_page,
            self.range_label(),
            self.page,
            self.page_count
        );
        out
    }
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}
