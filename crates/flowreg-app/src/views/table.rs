//! # Table State
//!
//! Client-side filtering, sorting and selection shared by every list view.
//!
//! - [`filter`] and [`sort`] never touch the caller's records; both return a
//!   new vector of references, so the source order and identity survive.
//! - [`activate_default_column`] and [`toggle_column`] maintain the
//!   single-active-column rule over a set of [`ColumnDescriptor`]s.
//! - [`TableState`] bundles records, columns, search terms and selection for
//!   one view so views never share list state.
//!
//! Records participate through the [`Tabular`] trait, which exposes named
//! fields for sorting and the string-valued fields used for search.

use flowreg_core::{Bucket, Droplet, User, UserGroup};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeSet;

// ============================================================================
// Record access
// ============================================================================

/// A record that can be displayed in a table.
pub trait Tabular {
    /// Identifier used for selection.
    fn record_id(&self) -> Cow<'_, str>;

    /// Value of the named field, `None` when the record has no such field.
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;

    /// Shallow string-valued fields matched by search terms.
    fn search_fields(&self) -> Vec<&str>;
}

fn opt_str(value: &Option<String>) -> Option<Cow<'_, str>> {
    value.as_deref().map(Cow::Borrowed)
}

fn opt_num<N: ToString>(value: Option<N>) -> Option<Cow<'static, str>> {
    value.map(|n| Cow::Owned(n.to_string()))
}

impl Tabular for Bucket {
    fn record_id(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.identifier)
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "identifier" => Some(Cow::Borrowed(&self.identifier)),
            "name" => Some(Cow::Borrowed(&self.name)),
            "description" => opt_str(&self.description),
            "createdTimestamp" => opt_num(self.created_timestamp),
            "allowPublicRead" => opt_num(self.allow_public_read),
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.identifier.as_str(), self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }
}

impl Tabular for Droplet {
    fn record_id(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.identifier)
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "identifier" => Some(Cow::Borrowed(&self.identifier)),
            "name" => Some(Cow::Borrowed(&self.name)),
            "description" => opt_str(&self.description),
            "bucketIdentifier" => Some(Cow::Borrowed(&self.bucket_identifier)),
            "bucketName" => opt_str(&self.bucket_name),
            "type" => Some(Cow::Borrowed(&self.droplet_type)),
            "createdTimestamp" => opt_num(self.created_timestamp),
            "modifiedTimestamp" => opt_num(self.modified_timestamp),
            "versionCount" => opt_num(self.version_count),
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.identifier.as_str(),
            self.name.as_str(),
            self.bucket_identifier.as_str(),
            self.droplet_type.as_str(),
        ];
        fields.extend(self.description.as_deref());
        fields.extend(self.bucket_name.as_deref());
        fields
    }
}

impl Tabular for User {
    fn record_id(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.identifier)
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "identifier" => Some(Cow::Borrowed(&self.identifier)),
            "identity" => Some(Cow::Borrowed(&self.identity)),
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.identifier.as_str(), self.identity.as_str()]
    }
}

impl Tabular for UserGroup {
    fn record_id(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.identifier)
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "identifier" => Some(Cow::Borrowed(&self.identifier)),
            "identity" => Some(Cow::Borrowed(&self.identity)),
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.identifier.as_str(), self.identity.as_str()]
    }
}

/// Untyped records: top-level object members only.
impl Tabular for Value {
    fn record_id(&self) -> Cow<'_, str> {
        self.field("identifier").unwrap_or(Cow::Borrowed(""))
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.get(name)? {
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        match self {
            Value::Object(map) => map.values().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

// ============================================================================
// Filter and sort
// ============================================================================

fn matches_term<T: Tabular + ?Sized>(record: &T, term: &str, fuzzy: bool) -> bool {
    let term = term.to_lowercase();
    record.search_fields().into_iter().any(|value| {
        let value = value.to_lowercase();
        if fuzzy {
            value.contains(&term)
        } else {
            value == term
        }
    })
}

/// Keep the records matching `term`.
///
/// Fuzzy mode matches a case-insensitive substring of any string field;
/// exact mode requires case-insensitive equality. A blank term keeps every
/// record. Apply once per term to AND terms together.
pub fn filter<'a, T, I>(records: I, term: &str, fuzzy: bool) -> Vec<&'a T>
where
    T: Tabular + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let term = term.trim();
    if term.is_empty() {
        return records.into_iter().collect();
    }
    records
        .into_iter()
        .filter(|record| matches_term(*record, term, fuzzy))
        .collect()
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl SortOrder {
    /// The opposite order.
    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Comparable form of a field value.
///
/// Numbers order numerically, text orders case-folded with the raw string as
/// tie-break. In a mixed column numbers come before text so the order stays
/// total.
#[derive(Debug)]
enum SortKey<'a> {
    Number(f64),
    Text { folded: String, raw: Cow<'a, str> },
}

impl<'a> SortKey<'a> {
    fn new(raw: Cow<'a, str>) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text {
                folded: raw.to_lowercase(),
                raw,
            },
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Number(_), Self::Text { .. }) => Ordering::Less,
            (Self::Text { .. }, Self::Number(_)) => Ordering::Greater,
            (
                Self::Text { folded: a, raw: ra },
                Self::Text { folded: b, raw: rb },
            ) => a.cmp(b).then_with(|| ra.cmp(rb)),
        }
    }
}

/// Stable sort by `field`.
///
/// Records without the field come after every record that has it, in both
/// directions.
pub fn sort<'a, T, I>(records: I, field: &str, order: SortOrder) -> Vec<&'a T>
where
    T: Tabular + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut keyed: Vec<(Option<SortKey<'a>>, &'a T)> = records
        .into_iter()
        .map(|record| (record.field(field).map(SortKey::new), record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.compare(b),
            SortOrder::Desc => b.compare(a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(_, record)| record).collect()
}

// ============================================================================
// Columns
// ============================================================================

/// Column metadata for one table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    /// Field name passed to [`sort`]
    pub name: String,
    /// Header text
    pub label: String,
    /// Whether clicking the header sorts
    pub sortable: bool,
    /// Whether rows are sorted by this column
    pub active: bool,
    /// Direction used when active
    pub sort_order: SortOrder,
}

impl ColumnDescriptor {
    /// A sortable, inactive column.
    pub fn sortable(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            sortable: true,
            active: false,
            sort_order: SortOrder::Asc,
        }
    }

    /// A display-only column.
    pub fn fixed(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            sortable: false,
            ..Self::sortable(name, label)
        }
    }
}

/// Activate the first sortable column with `order` and deactivate the rest.
///
/// Returns the index of the activated column, or `None` when no column is
/// sortable (every column is then inactive).
pub fn activate_default_column(columns: &mut [ColumnDescriptor], order: SortOrder) -> Option<usize> {
    let chosen = columns.iter().position(|c| c.sortable);
    for (i, column) in columns.iter_mut().enumerate() {
        column.active = Some(i) == chosen;
        if column.active {
            column.sort_order = order;
        }
    }
    chosen
}

/// Sort by the named column.
///
/// Toggling the active column flips its order; toggling another sortable
/// column activates it ascending. Returns the resulting order, or `None` if
/// the column is unknown or not sortable.
pub fn toggle_column(columns: &mut [ColumnDescriptor], name: &str) -> Option<SortOrder> {
    let target = columns.iter().position(|c| c.name == name && c.sortable)?;
    let order = if columns[target].active {
        columns[target].sort_order.reversed()
    } else {
        SortOrder::Asc
    };
    for (i, column) in columns.iter_mut().enumerate() {
        column.active = i == target;
    }
    columns[target].sort_order = order;
    Some(order)
}

/// The active column, if any.
pub fn active_column(columns: &[ColumnDescriptor]) -> Option<&ColumnDescriptor> {
    columns.iter().find(|c| c.active)
}

// ============================================================================
// Per-view state
// ============================================================================

/// Records, columns, search terms and selection for one list view.
#[derive(Clone, Debug)]
pub struct TableState<T> {
    records: Vec<T>,
    columns: Vec<ColumnDescriptor>,
    search_terms: Vec<String>,
    fuzzy: bool,
    selected: BTreeSet<String>,
}

impl<T: Tabular> TableState<T> {
    /// Create an empty table; the first sortable column becomes active.
    pub fn new(mut columns: Vec<ColumnDescriptor>, fuzzy: bool) -> Self {
        activate_default_column(&mut columns, SortOrder::Asc);
        Self {
            records: Vec::new(),
            columns,
            search_terms: Vec::new(),
            fuzzy,
            selected: BTreeSet::new(),
        }
    }

    // ─── Queries ─────────────────────────────────────────────

    /// All loaded records, unfiltered.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Column descriptors in display order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Active search terms.
    pub fn search_terms(&self) -> &[String] {
        &self.search_terms
    }

    /// Whether search terms match substrings.
    pub fn is_fuzzy(&self) -> bool {
        self.fuzzy
    }

    /// Rows to display: every search term applied, then the active sort.
    pub fn rows(&self) -> Vec<&T> {
        let mut rows: Vec<&T> = self.records.iter().collect();
        for term in &self.search_terms {
            rows = filter(rows, term, self.fuzzy);
        }
        match active_column(&self.columns) {
            Some(column) => sort(rows, &column.name, column.sort_order),
            None => rows,
        }
    }

    /// Whether the record with `id` is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Selected records in source order.
    pub fn selected(&self) -> Vec<&T> {
        self.records
            .iter()
            .filter(|r| self.selected.contains(&*r.record_id()))
            .collect()
    }

    /// Number of selected records.
    pub fn selection_count(&self) -> usize {
        self.selected.len()
    }

    /// Whether every displayed row is selected (false for an empty table).
    pub fn all_displayed_selected(&self) -> bool {
        let rows = self.rows();
        !rows.is_empty()
            && rows
                .iter()
                .all(|r| self.selected.contains(&*r.record_id()))
    }

    // ─── Mutations ───────────────────────────────────────────

    /// Replace the records; selections of records that disappeared are dropped.
    pub fn set_records(&mut self, records: Vec<T>) {
        let present: BTreeSet<String> = records
            .iter()
            .map(|r| r.record_id().into_owned())
            .collect();
        self.selected.retain(|id| present.contains(id));
        self.records = records;
    }

    /// Add a search term; blank and duplicate terms are ignored.
    pub fn add_search_term(&mut self, term: impl Into<String>) -> bool {
        let term = term.into().trim().to_string();
        if term.is_empty() || self.search_terms.contains(&term) {
            return false;
        }
        self.search_terms.push(term);
        true
    }

    /// Remove a search term; returns whether it was present.
    pub fn remove_search_term(&mut self, term: &str) -> bool {
        let before = self.search_terms.len();
        self.search_terms.retain(|t| t != term);
        self.search_terms.len() != before
    }

    /// Remove every search term.
    pub fn clear_search_terms(&mut self) {
        self.search_terms.clear();
    }

    /// Switch between substring and whole-value matching.
    pub fn set_fuzzy(&mut self, fuzzy: bool) {
        self.fuzzy = fuzzy;
    }

    /// Toggle sorting on a column.
    pub fn sort_by(&mut self, column: &str) -> Option<SortOrder> {
        toggle_column(&mut self.columns, column)
    }

    /// Activate `column` with an explicit order. Returns `false` if the
    /// column is unknown or not sortable.
    pub fn set_sort(&mut self, column: &str, order: SortOrder) -> bool {
        if toggle_column(&mut self.columns, column).is_none() {
            return false;
        }
        if let Some(active) = self.columns.iter_mut().find(|c| c.active) {
            active.sort_order = order;
        }
        true
    }

    /// Toggle one record's selection. Returns the new state.
    pub fn toggle_selected(&mut self, id: &str) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    /// Select one record; selecting it again is a no-op.
    pub fn select(&mut self, id: &str) {
        self.selected.insert(id.to_string());
    }

    /// Select every displayed row, or clear the selection if all are already selected.
    pub fn toggle_all_displayed(&mut self) {
        if self.all_displayed_selected() {
            self.clear_selection();
        } else {
            let ids: Vec<String> = self
                .rows()
                .iter()
                .map(|r| r.record_id().into_owned())
                .collect();
            self.selected.extend(ids);
        }
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }
}
