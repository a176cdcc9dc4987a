//! Contacts imported from the outreach spreadsheet.

use serde::{Deserialize, Serialize};

/// A spreadsheet column of the contact sheet.
///
/// The header text doubles as the template placeholder name, so
/// `[Nombre contacto]` in a message body resolves to [`Column::ContactName`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    CompanyName,
    TaxId,
    BusinessType,
    Address,
    Commune,
    City,
    ContactName,
    Phone,
}

impl Column {
    /// All columns, in sheet order.
    pub const ALL: [Column; 8] = [
        Column::CompanyName,
        Column::TaxId,
        Column::BusinessType,
        Column::Address,
        Column::Commune,
        Column::City,
        Column::ContactName,
        Column::Phone,
    ];

    /// Header text as it appears in the sheet.
    pub fn header(&self) -> &'static str {
        match self {
            Self::CompanyName => "Razón social",
            Self::TaxId => "RUT",
            Self::BusinessType => "Giro",
            Self::Address => "Dirección",
            Self::Commune => "Comuna",
            Self::City => "Ciudad",
            Self::ContactName => "Nombre contacto",
            Self::Phone => "Teléfono",
        }
    }

    /// Look up a column by its header text (surrounding whitespace ignored).
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        Self::ALL.into_iter().find(|c| c.header() == header)
    }
}

/// One row of the contact sheet. Every value is text; blanks are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub company_name: String,
    pub tax_id: String,
    pub business_type: String,
    pub address: String,
    pub commune: String,
    pub city: String,
    pub contact_name: String,
    /// Raw phone as typed in the sheet.
    pub phone: String,
}

impl Contact {
    /// Value of the given column.
    pub fn field(&self, column: Column) -> &str {
        match column {
            Column::CompanyName => &self.company_name,
            Column::TaxId => &self.tax_id,
            Column::BusinessType => &self.business_type,
            Column::Address => &self.address,
            Column::Commune => &self.commune,
            Column::City => &self.city,
            Column::ContactName => &self.contact_name,
            Column::Phone => &self.phone,
        }
    }

    /// Mutable access to the given column.
    pub fn field_mut(&mut self, column: Column) -> &mut String {
        match column {
            Column::CompanyName => &mut self.company_name,
            Column::TaxId => &mut self.tax_id,
            Column::BusinessType => &mut self.business_type,
            Column::Address => &mut self.address,
            Column::Commune => &mut self.commune,
            Column::City => &mut self.city,
            Column::ContactName => &mut self.contact_name,
            Column::Phone => &mut self.phone,
        }
    }
}

/// Columns the recipient selection can be narrowed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterColumn {
    City,
    Commune,
    BusinessType,
}

impl FilterColumn {
    /// Backing database column.
    pub fn db_column(&self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Commune => "commune",
            Self::BusinessType => "business_type",
        }
    }
}

/// Recipient selection. `None` on a field means "all"; matching is
/// case-insensitive equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub city: Option<String>,
    pub commune: Option<String>,
    pub business_type: Option<String>,
}

impl ContactFilter {
    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.commune.is_none() && self.business_type.is_none()
    }

    /// Set criteria as `(column, lowercase value)` pairs.
    pub fn criteria(&self) -> Vec<(FilterColumn, String)> {
        [
            (FilterColumn::City, &self.city),
            (FilterColumn::Commune, &self.commune),
            (FilterColumn::BusinessType, &self.business_type),
        ]
        .into_iter()
        .filter_map(|(col, v)| {
            v.as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (col, v.to_lowercase()))
        })
        .collect()
    }

    /// In-memory equivalent of the store query.
    pub fn matches(&self, contact: &Contact) -> bool {
        self.criteria().iter().all(|(col, want)| {
            let have = match col {
                FilterColumn::City => &contact.city,
                FilterColumn::Commune => &contact.commune,
                FilterColumn::BusinessType => &contact.business_type,
            };
            have.to_lowercase() == *want
        })
    }
}
