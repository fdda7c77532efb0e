use crate::domain::isbn::validate_isbn10;
use crate::domain::presence::{check_presence, PresenceMode};
use crate::utils::error::{BookError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// One element of the input array, before any coercion.
pub type RawRecord = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum BookField {
    Title,
    Author,
    Publisher,
    Price,
    #[cfg_attr(feature = "cli", value(name = "isbn_10"))]
    Isbn10,
    #[cfg_attr(feature = "cli", value(name = "isbn_13"))]
    Isbn13,
    Subtitle,
}

impl BookField {
    pub const ALL: [BookField; 7] = [
        BookField::Title,
        BookField::Author,
        BookField::Publisher,
        BookField::Price,
        BookField::Isbn10,
        BookField::Isbn13,
        BookField::Subtitle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Publisher => "publisher",
            BookField::Price => "price",
            BookField::Isbn10 => "isbn_10",
            BookField::Isbn13 => "isbn_13",
            BookField::Subtitle => "subtitle",
        }
    }
}

impl fmt::Display for BookField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookField {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        BookField::ALL
            .into_iter()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| BookError::InvalidConfigValueError {
                field: "fields".to_string(),
                value: name.to_string(),
                reason: format!(
                    "Unknown book field. Valid fields: {}",
                    BookField::ALL.map(BookField::as_str).join(", ")
                ),
            })
    }
}

/// A validated book. Fields are fixed at construction; see
/// [`BookRecord::with_changes`] for producing an updated copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRecord {
    title: String,
    author: String,
    publisher: String,
    price: f64,
    isbn_10: Option<String>,
    isbn_13: Option<String>,
    subtitle: Option<String>,
    /// Mode the record was admitted under; updates are re-checked with it.
    #[serde(skip)]
    presence: PresenceMode,
}

impl BookRecord {
    /// Builds a record using the default presence mode.
    pub fn from_raw(raw: &RawRecord) -> Result<Self> {
        Self::from_raw_with(raw, PresenceMode::default())
    }

    pub fn from_raw_with(raw: &RawRecord, mode: PresenceMode) -> Result<Self> {
        check_presence(raw, mode)?;

        for key in raw.keys() {
            if key.parse::<BookField>().is_err() {
                tracing::debug!("Ignoring unknown field '{}'", key);
            }
        }

        let title = lowercase(required_text(raw, BookField::Title)?);
        if title.is_empty() {
            return Err(BookError::InvalidField {
                field: BookField::Title.to_string(),
                reason: "title cannot be empty".to_string(),
            });
        }

        let record = Self {
            title,
            author: lowercase(required_text(raw, BookField::Author)?),
            publisher: lowercase(required_text(raw, BookField::Publisher)?),
            price: price(raw)?,
            isbn_10: optional_text(raw, BookField::Isbn10)?.map(lowercase),
            isbn_13: optional_text(raw, BookField::Isbn13)?.map(lowercase),
            subtitle: optional_text(raw, BookField::Subtitle)?.map(lowercase),
            presence: mode,
        };

        if let Some(isbn_10) = &record.isbn_10 {
            validate_isbn10(isbn_10)?;
        }

        Ok(record)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn isbn_10(&self) -> Option<&str> {
        self.isbn_10.as_deref()
    }

    pub fn isbn_13(&self) -> Option<&str> {
        self.isbn_13.as_deref()
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn presence_mode(&self) -> PresenceMode {
        self.presence
    }

    /// Field value as JSON; absent optionals are `null`.
    pub fn get(&self, field: BookField) -> Value {
        let text = |v: &Option<String>| v.clone().map(Value::String).unwrap_or(Value::Null);
        match field {
            BookField::Title => Value::String(self.title.clone()),
            BookField::Author => Value::String(self.author.clone()),
            BookField::Publisher => Value::String(self.publisher.clone()),
            BookField::Price => serde_json::json!(self.price),
            BookField::Isbn10 => text(&self.isbn_10),
            BookField::Isbn13 => text(&self.isbn_13),
            BookField::Subtitle => text(&self.subtitle),
        }
    }

    /// Records cannot be written to. Always fails with
    /// [`BookError::ImmutabilityViolation`].
    pub fn assign(&self, field: &str, _value: Value) -> Result<()> {
        Err(BookError::ImmutabilityViolation {
            field: field.to_string(),
        })
    }

    /// The record's fields as a raw mapping. An absent subtitle is omitted;
    /// the identifier keys are always kept, as `null` when absent.
    pub fn to_raw(&self) -> RawRecord {
        BookField::ALL
            .into_iter()
            .map(|field| (field, self.get(field)))
            .filter(|(field, value)| {
                !value.is_null() || matches!(field, BookField::Isbn10 | BookField::Isbn13)
            })
            .map(|(field, value)| (field.as_str().to_string(), value))
            .collect()
    }

    /// Returns a new record with `changes` applied over this one. The result
    /// goes through the full construction gate again, under the presence mode
    /// this record was built with.
    pub fn with_changes(&self, changes: &RawRecord) -> Result<Self> {
        let mut raw = self.to_raw();
        for (key, value) in changes {
            raw.insert(key.clone(), value.clone());
        }
        Self::from_raw_with(&raw, self.presence)
    }
}

impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |v: &Option<String>| match v {
            Some(s) => format!("'{}'", s),
            None => "None".to_string(),
        };
        write!(
            f,
            "title='{}' author='{}' publisher='{}' price={} isbn_10={} isbn_13={} subtitle={}",
            self.title,
            self.author,
            self.publisher,
            self.price,
            opt(&self.isbn_10),
            opt(&self.isbn_13),
            opt(&self.subtitle)
        )
    }
}

fn lowercase(s: String) -> String {
    s.to_lowercase()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn coerce_text(field: BookField, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(BookError::FieldCoercion {
            field: field.to_string(),
            expected: "text",
            found: json_type(other).to_string(),
        }),
    }
}

fn required_text(raw: &RawRecord, field: BookField) -> Result<String> {
    match raw.get(field.as_str()) {
        None | Some(Value::Null) => Err(BookError::MissingField {
            field: field.to_string(),
        }),
        Some(value) => coerce_text(field, value),
    }
}

fn optional_text(raw: &RawRecord, field: BookField) -> Result<Option<String>> {
    match raw.get(field.as_str()) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => coerce_text(field, value).map(Some),
    }
}

fn price(raw: &RawRecord) -> Result<f64> {
    let field = BookField::Price;
    let value = match raw.get(field.as_str()) {
        None | Some(Value::Null) => {
            return Err(BookError::MissingField {
                field: field.to_string(),
            })
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(other) => {
            return Err(BookError::FieldCoercion {
                field: field.to_string(),
                expected: "number",
                found: json_type(other).to_string(),
            })
        }
    };

    let price = value.ok_or_else(|| BookError::FieldCoercion {
        field: field.to_string(),
        expected: "number",
        found: "non-numeric string".to_string(),
    })?;

    if !price.is_finite() || price < 0.0 {
        return Err(BookError::InvalidField {
            field: field.to_string(),
            reason: format!("price must be a non-negative number, got {}", price),
        });
    }

    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::Isbn10Reason;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test fixtures are objects"),
        }
    }

    fn gatsby() -> RawRecord {
        raw(json!({
            "title": "The Great Gatsby",
            "author": "F. Scott Fitzgerald",
            "publisher": "Scribner",
            "price": 10.99,
            "isbn_10": "0306406152",
            "isbn_13": "978-0306406157",
            "subtitle": null
        }))
    }

    #[test]
    fn test_construct_lowercases_text() {
        let book = BookRecord::from_raw(&gatsby()).unwrap();
        assert_eq!(book.title(), "the great gatsby");
        assert_eq!(book.author(), "f. scott fitzgerald");
        assert_eq!(book.publisher(), "scribner");
        assert_eq!(book.price(), 10.99);
        assert_eq!(book.isbn_10(), Some("0306406152"));
        assert_eq!(book.subtitle(), None);
    }

    #[test]
    fn test_isbn13_only_constructs() {
        let mut record = gatsby();
        record.remove("isbn_10");
        let book = BookRecord::from_raw(&record).unwrap();
        assert_eq!(book.isbn_10(), None);
        assert_eq!(book.isbn_13(), Some("978-0306406157"));
    }

    #[test]
    fn test_no_identifiers_fails_before_coercion() {
        let record = raw(json!({"title": "Untitled", "price": "not a number"}));
        assert!(matches!(
            BookRecord::from_raw(&record),
            Err(BookError::MissingIdentifier { .. })
        ));
    }

    #[test]
    fn test_hyphenated_isbn10_keeps_raw_form() {
        let mut record = gatsby();
        record.insert("isbn_10".to_string(), json!("0-306-40615-2"));
        let book = BookRecord::from_raw(&record).unwrap();
        assert_eq!(book.isbn_10(), Some("0-306-40615-2"));
    }

    #[test]
    fn test_uppercase_x_is_stored_lowercase() {
        let mut record = gatsby();
        record.insert("isbn_10".to_string(), json!("080442957X"));
        let book = BookRecord::from_raw(&record).unwrap();
        assert_eq!(book.isbn_10(), Some("080442957x"));
    }

    #[test]
    fn test_bad_isbn10_aborts_construction() {
        let mut record = gatsby();
        record.insert("isbn_10".to_string(), json!("0306406153"));
        match BookRecord::from_raw(&record) {
            Err(BookError::Isbn10Format { value, reason }) => {
                assert_eq!(value, "0306406153");
                assert!(matches!(reason, Isbn10Reason::Checksum { .. }));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_null_isbn10_skips_checksum_in_key_exists_mode() {
        let record = raw(json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "publisher": "Ace",
            "price": 9.99,
            "isbn_10": null
        }));
        let book = BookRecord::from_raw_with(&record, PresenceMode::KeyExists).unwrap();
        assert_eq!(book.isbn_10(), None);
        assert!(BookRecord::from_raw_with(&record, PresenceMode::NonNull).is_err());
    }

    #[test]
    fn test_price_coercion() {
        let mut record = gatsby();
        record.insert("price".to_string(), json!("12.50"));
        assert_eq!(BookRecord::from_raw(&record).unwrap().price(), 12.5);

        record.insert("price".to_string(), json!("cheap"));
        assert!(matches!(
            BookRecord::from_raw(&record),
            Err(BookError::FieldCoercion { .. })
        ));

        record.insert("price".to_string(), json!(true));
        assert!(matches!(
            BookRecord::from_raw(&record),
            Err(BookError::FieldCoercion { expected: "number", .. })
        ));

        record.insert("price".to_string(), json!(-1.0));
        assert!(matches!(
            BookRecord::from_raw(&record),
            Err(BookError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_missing_and_mistyped_text_fields() {
        let mut record = gatsby();
        record.remove("author");
        assert!(matches!(
            BookRecord::from_raw(&record),
            Err(BookError::MissingField { field }) if field == "author"
        ));

        let mut record = gatsby();
        record.insert("publisher".to_string(), json!(["a", "b"]));
        assert!(matches!(
            BookRecord::from_raw(&record),
            Err(BookError::FieldCoercion { field, .. }) if field == "publisher"
        ));

        let mut record = gatsby();
        record.insert("title".to_string(), json!(""));
        assert!(matches!(
            BookRecord::from_raw(&record),
            Err(BookError::InvalidField { .. })
        ));

        record.insert("title".to_string(), json!("   "));
        assert_eq!(BookRecord::from_raw(&record).unwrap().title(), "   ");
    }

    #[test]
    fn test_assign_is_rejected() {
        let book = BookRecord::from_raw(&gatsby()).unwrap();
        match book.assign("title", json!("Changing the Title of the Book")) {
            Err(BookError::ImmutabilityViolation { field }) => assert_eq!(field, "title"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(book.title(), "the great gatsby");
    }

    #[test]
    fn test_with_changes_revalidates() {
        let book = BookRecord::from_raw(&gatsby()).unwrap();

        let renamed = book
            .with_changes(&raw(json!({"title": "Gatsby Reissued"})))
            .unwrap();
        assert_eq!(renamed.title(), "gatsby reissued");
        assert_eq!(book.title(), "the great gatsby");

        assert!(book
            .with_changes(&raw(json!({"isbn_10": "12345"})))
            .is_err());
    }

    #[test]
    fn test_with_changes_keeps_key_exists_mode() {
        let record = raw(json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "publisher": "Ace",
            "price": 9.99,
            "isbn_10": null
        }));
        let book = BookRecord::from_raw_with(&record, PresenceMode::KeyExists).unwrap();

        let repriced = book.with_changes(&raw(json!({"price": 12.0}))).unwrap();
        assert_eq!(repriced.price(), 12.0);
        assert_eq!(repriced.isbn_10(), None);
        assert_eq!(repriced.presence_mode(), PresenceMode::KeyExists);
    }

    #[test]
    fn test_with_changes_keeps_non_null_mode() {
        let mut record = gatsby();
        record.remove("isbn_13");
        let book = BookRecord::from_raw(&record).unwrap();

        assert!(matches!(
            book.with_changes(&raw(json!({"isbn_10": null}))),
            Err(BookError::MissingIdentifier { .. })
        ));
    }

    #[test]
    fn test_to_raw_keeps_identifier_keys() {
        let mut record = gatsby();
        record.remove("isbn_10");
        let mapping = BookRecord::from_raw(&record).unwrap().to_raw();
        assert_eq!(mapping.get("isbn_10"), Some(&Value::Null));
        assert!(!mapping.contains_key("subtitle"));
    }

    #[test]
    fn test_construction_is_repeatable() {
        let first = BookRecord::from_raw(&gatsby()).unwrap();
        let second = BookRecord::from_raw(&gatsby()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_display_matches_field_order() {
        let book = BookRecord::from_raw(&gatsby()).unwrap();
        assert_eq!(
            book.to_string(),
            "title='the great gatsby' author='f. scott fitzgerald' publisher='scribner' \
             price=10.99 isbn_10='0306406152' isbn_13='978-0306406157' subtitle=None"
        );
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in BookField::ALL {
            assert_eq!(field.as_str().parse::<BookField>().unwrap(), field);
        }
        assert!("isbn".parse::<BookField>().is_err());
    }
}
