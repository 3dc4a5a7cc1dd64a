// Rust guideline compliant 2026-10-12

//! Logical columns of the input files and header resolution.
//!
//! Every logical column accepts its canonical English header and the header
//! used by the card-company exports the dashboard was built around.

use std::collections::HashMap;
use std::path::Path;

use domain::{Category, LoadError};

/// A logical column and the raw headers that may carry it.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// Canonical header, also used in error messages.
    pub canonical: &'static str,
    /// Other accepted spellings.
    pub aliases: &'static [&'static str],
}

/// Customer identifier; renamed to `customer_id` on load.
pub const CUSTOMER_ID: Column = Column {
    canonical: "customer_id",
    aliases: &["발급회원번호", "CustomerID"],
};

/// Reporting month, `YYYYMM`.
pub const PERIOD: Column = Column {
    canonical: "period",
    aliases: &["기준년월"],
};

/// Current-month credit spend.
pub const CURRENT_SPEND: Column = Column {
    canonical: "credit_spend_b0m",
    aliases: &["이용금액_신용_B0M"],
};

/// Credit spend summed over the previous three months.
pub const TRAILING_3M_SPEND: Column = Column {
    canonical: "credit_spend_r3m",
    aliases: &["이용금액_신용_R3M"],
};

/// Three-month credit + check aggregate. Optional everywhere.
pub const TRAILING_3M_TOTAL: Column = Column {
    canonical: "total_spend_r3m",
    aliases: &["이용금액_R3M_신용체크"],
};

/// Column carrying the monthly spend of `category`.
#[must_use]
pub fn category_column(category: Category) -> Column {
    match category {
        Category::Shopping => Column { canonical: "spend_shopping", aliases: &["이용금액_쇼핑"] },
        Category::Dining => Column { canonical: "spend_dining", aliases: &["이용금액_요식"] },
        Category::Transport => Column { canonical: "spend_transport", aliases: &["이용금액_교통"] },
        Category::Medical => Column { canonical: "spend_medical", aliases: &["이용금액_의료"] },
        Category::BillPayment => {
            Column { canonical: "spend_bill_payment", aliases: &["이용금액_납부"] }
        }
        Category::Education => Column { canonical: "spend_education", aliases: &["이용금액_교육"] },
        Category::Leisure => Column { canonical: "spend_leisure", aliases: &["이용금액_여유생활"] },
        Category::Social => Column { canonical: "spend_social", aliases: &["이용금액_사교활동"] },
        Category::DailyLiving => {
            Column { canonical: "spend_daily_living", aliases: &["이용금액_일상생활"] }
        }
        Category::Overseas => Column { canonical: "spend_overseas", aliases: &["이용금액_해외"] },
    }
}

/// Header name -> field position, built once per file.
#[derive(Debug)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    /// Index `headers`, trimming whitespace and a leading byte-order mark.
    pub fn new<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut positions = HashMap::new();
        for (i, header) in headers.into_iter().enumerate() {
            let name = header.trim_start_matches('\u{feff}').trim().to_owned();
            // Duplicated headers: the first one wins.
            positions.entry(name).or_insert(i);
        }
        Self { positions }
    }

    /// Position of `column`, trying the canonical header first.
    #[must_use]
    pub fn find(&self, column: &Column) -> Option<usize> {
        std::iter::once(column.canonical)
            .chain(column.aliases.iter().copied())
            .find_map(|name| self.positions.get(name).copied())
    }

    /// Position of a column the file cannot be used without.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::SchemaMismatch`] naming the canonical header.
    pub fn require(&self, column: &Column, path: &Path) -> Result<usize, LoadError> {
        self.find(column).ok_or_else(|| LoadError::SchemaMismatch {
            path: path.to_path_buf(),
            column: column.canonical,
        })
    }
}
