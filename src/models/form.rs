use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    FirstName,
    LastName,
    Email,
    Age,
    Photo,
    Date,
    Time,
    General,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::FirstName => "firstName",
            FormField::LastName => "lastName",
            FormField::Email => "email",
            FormField::Age => "age",
            FormField::Photo => "photo",
            FormField::Date => "date",
            FormField::Time => "time",
            FormField::General => "general",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age as entered. Text that does not parse is kept so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgeInput {
    Years(i64),
    NotANumber(String),
}

impl AgeInput {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(years) => AgeInput::Years(years),
            Err(_) => AgeInput::NotANumber(raw.to_string()),
        }
    }

    pub fn years(&self) -> Option<i64> {
        match self {
            AgeInput::Years(years) => Some(*years),
            AgeInput::NotANumber(_) => None,
        }
    }
}

impl From<i64> for AgeInput {
    fn from(years: i64) -> Self {
        AgeInput::Years(years)
    }
}

/// Metadata of the uploaded photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoFile {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl PhotoFile {
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
        }
    }

    /// Reads the file size from disk and guesses the MIME type from the extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self::new(name, metadata.len(), mime_from_extension(path)))
    }
}

pub fn mime_from_extension(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: AgeInput,
    pub photo: Option<PhotoFile>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

impl FormData {
    pub fn with_defaults(default_age: i64, today: NaiveDate) -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            age: AgeInput::Years(default_age),
            photo: None,
            date: Some(today),
            time: None,
        }
    }

    pub fn time_slot(&self) -> Option<&str> {
        self.time.as_deref().filter(|time| !time.is_empty())
    }
}

/// A single user edit, routed through `FormState::apply`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    FirstName(String),
    LastName(String),
    Email(String),
    Age(AgeInput),
    Photo(Option<PhotoFile>),
    Date(Option<NaiveDate>),
    Time(Option<String>),
}

impl FieldEdit {
    pub fn field(&self) -> FormField {
        match self {
            FieldEdit::FirstName(_) => FormField::FirstName,
            FieldEdit::LastName(_) => FormField::LastName,
            FieldEdit::Email(_) => FormField::Email,
            FieldEdit::Age(_) => FormField::Age,
            FieldEdit::Photo(_) => FormField::Photo,
            FieldEdit::Date(_) => FormField::Date,
            FieldEdit::Time(_) => FormField::Time,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<FormField, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn general(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(FormField::General, message);
        errors
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: FormField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}
