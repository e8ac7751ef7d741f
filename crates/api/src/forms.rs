//! Multipart form collection for admin and public upload endpoints.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;
use coffer_core::types::DbId;

use crate::error::{AppError, AppResult};

/// A file part of a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// All text fields and non-empty file parts of a multipart body.
///
/// Browsers send an empty file part when a file input is left blank; those
/// parts are dropped.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, Vec<String>>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    pub async fn collect(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let data = field.bytes().await?;
                    if !file_name.is_empty() && !data.is_empty() {
                        form.files.insert(
                            name,
                            UploadedFile {
                                file_name,
                                data: data.to_vec(),
                            },
                        );
                    }
                }
                None => {
                    let text = field.text().await?;
                    form.fields.entry(name).or_default().push(text);
                }
            }
        }

        Ok(form)
    }

    /// Raw value of a text field (first occurrence), untrimmed.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Trimmed value of a text field, or `""` when absent.
    pub fn trimmed(&self, name: &str) -> &str {
        self.text(name).map(str::trim).unwrap_or("")
    }

    /// Trimmed value of a text field, `None` when absent.
    pub fn string(&self, name: &str) -> Option<String> {
        self.text(name).map(|v| v.trim().to_string())
    }

    /// Parse a non-empty field. Absent or blank fields are `None`.
    pub fn parse<T>(&self, name: &str) -> AppResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.text(name).map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|e| AppError::BadRequest(format!("Invalid value for '{name}': {e}"))),
        }
    }

    /// Checkbox-style boolean: `true`, `on`, `1`, `yes` are true.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.text(name).map(|raw| {
            matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "true" | "on" | "1" | "yes"
            )
        })
    }

    /// IDs given as repeated fields and/or comma-separated values.
    /// `None` when the field is absent.
    pub fn ids(&self, name: &str) -> AppResult<Option<Vec<DbId>>> {
        let Some(values) = self.fields.get(name) else {
            return Ok(None);
        };

        let mut ids = Vec::new();
        for part in values.iter().flat_map(|v| v.split(',')) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let id = part
                .parse()
                .map_err(|_| AppError::BadRequest(format!("Invalid id '{part}' in '{name}'")))?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(Some(ids))
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    /// Append a text field value.
    #[cfg(test)]
    fn insert(&mut self, name: &str, value: &str) {
        self.fields
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }
}
