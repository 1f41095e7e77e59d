use itertools::Itertools;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Accepted header spellings, first present non-empty cell wins.
pub const SECTOR_HEADERS: &[&str] = &["Sector", "\u{feff}Sector", "ector", "SECTOR"];
pub const GENERAL_HEADERS: &[&str] = &["Actividad general", "Act_general", "Actividad General"];
pub const SPECIFIC_HEADERS: &[&str] = &[
    "Actividad específica",
    "Actividad especifica",
    "Act_especifica",
    "Actividad Específica",
];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Activity {
    pub sector: String,
    pub general: String,
    pub specific: String,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts = [&self.sector, &self.general, &self.specific];
        write!(f, "{}", parts.iter().filter(|p| !p.is_empty()).join(" / "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Allowed,
    Prohibited,
    Unspecified,
}

impl Verdict {
    pub fn parse(cell: &str) -> Self {
        match cell.trim().to_uppercase().as_str() {
            "A" => Verdict::Allowed,
            "P" => Verdict::Prohibited,
            _ => Verdict::Unspecified,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuleRow {
    pub activity: Activity,
    verdicts: BTreeMap<String, Verdict>,
}

fn first_alias(cells: &BTreeMap<String, String>, aliases: &[&str]) -> String {
    aliases
        .iter()
        .filter_map(|alias| cells.get(*alias))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

impl RuleRow {
    /// Build a row from `(header, cell)` pairs. Every column gets a verdict,
    /// including the descriptive ones, so column presence can be checked
    /// against any zoning code.
    pub fn from_cells<K, V>(cells: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let cells: BTreeMap<String, String> = cells
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let activity = Activity {
            sector: first_alias(&cells, SECTOR_HEADERS),
            general: first_alias(&cells, GENERAL_HEADERS),
            specific: first_alias(&cells, SPECIFIC_HEADERS),
        };
        let verdicts = cells
            .iter()
            .map(|(column, cell)| (column.clone(), Verdict::parse(cell)))
            .collect();
        RuleRow { activity, verdicts }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.verdicts.contains_key(column)
    }

    pub fn verdict(&self, column: &str) -> Verdict {
        self.verdicts
            .get(column)
            .copied()
            .unwrap_or(Verdict::Unspecified)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogUnavailable {
    RuleTableMissing,
    RuleTableEmpty,
    ColumnNotFound(String),
}

impl fmt::Display for CatalogUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CatalogUnavailable::RuleTableMissing => write!(f, "rule table failed to load"),
            CatalogUnavailable::RuleTableEmpty => write!(f, "rule table empty"),
            CatalogUnavailable::ColumnNotFound(code) => write!(f, "column {} not found", code),
        }
    }
}

impl Serialize for CatalogUnavailable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Catalog {
    pub allowed: Vec<Activity>,
    pub prohibited: Vec<Activity>,
}

#[derive(Debug, Default, Clone)]
pub struct RuleTable {
    rows: Vec<RuleRow>,
}

impl RuleTable {
    pub fn new(rows: Vec<RuleRow>) -> Self {
        RuleTable { rows }
    }

    pub fn rows(&self) -> &[RuleRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column presence is judged on the first row only.
    pub fn has_column(&self, column: &str) -> bool {
        self.rows.first().map_or(false, |row| row.has_column(column))
    }

    /// Partition the activities by their verdict in `column`, keeping
    /// table order.
    pub fn catalog(&self, column: &str) -> Result<Catalog, CatalogUnavailable> {
        if self.is_empty() {
            return Err(CatalogUnavailable::RuleTableEmpty);
        }
        if !self.has_column(column) {
            return Err(CatalogUnavailable::ColumnNotFound(column.into()));
        }
        let mut catalog = Catalog::default();
        for row in self.rows.iter() {
            match row.verdict(column) {
                Verdict::Allowed => catalog.allowed.push(row.activity.clone()),
                Verdict::Prohibited => catalog.prohibited.push(row.activity.clone()),
                Verdict::Unspecified => {}
            }
        }
        Ok(catalog)
    }
}
