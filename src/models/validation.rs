//! Field-level validation shared by the record drafts

use serde_json::Value;

use crate::error::{AppError, FieldError, Result};

use super::{GeoJsonDraft, GeoJsonPoint};

/// Collects every failed check so a request reports all problems at once
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Trimmed, non-empty string
    pub fn required_text(&mut self, field: &str, value: Option<&str>, message: Option<&str>) -> String {
        match value.map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => {
                self.push(field, required_message(field, message));
                String::new()
            }
        }
    }

    pub fn optional_text(&mut self, value: Option<&str>) -> Option<String> {
        value.map(|text| text.trim().to_string())
    }

    pub fn required_number(
        &mut self,
        field: &str,
        value: Option<f64>,
        min: Option<f64>,
        max: Option<f64>,
        message: Option<&str>,
    ) -> f64 {
        match value {
            Some(number) => {
                self.check_range(field, number, min, max);
                number
            }
            None => {
                self.push(field, required_message(field, message));
                0.0
            }
        }
    }

    pub fn optional_number(
        &mut self,
        field: &str,
        value: Option<f64>,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Option<f64> {
        if let Some(number) = value {
            self.check_range(field, number, min, max);
        }
        value
    }

    fn check_range(&mut self, field: &str, number: f64, min: Option<f64>, max: Option<f64>) {
        if !number.is_finite() {
            self.push(field, format!("Path `{}` must be a finite number.", field));
            return;
        }
        if let Some(min) = min {
            if number < min {
                self.push(
                    field,
                    format!(
                        "Path `{}` ({}) is less than minimum allowed value ({}).",
                        field, number, min
                    ),
                );
            }
        }
        if let Some(max) = max {
            if number > max {
                self.push(
                    field,
                    format!(
                        "Path `{}` ({}) is more than maximum allowed value ({}).",
                        field, number, max
                    ),
                );
            }
        }
    }

    /// Parse a closed-set string value. A missing value falls back to `default`;
    /// without a default it is reported when `required` is set.
    pub fn enum_value<T: Copy>(
        &mut self,
        field: &str,
        value: Option<&str>,
        parse: fn(&str) -> Option<T>,
        default: Option<T>,
        required: Option<&str>,
    ) -> Option<T> {
        match value {
            Some(text) => match parse(text) {
                Some(parsed) => Some(parsed),
                None => {
                    self.push(
                        field,
                        format!("`{}` is not a valid enum value for path `{}`.", text, field),
                    );
                    default
                }
            },
            None => {
                if default.is_none() {
                    if let Some(message) = required {
                        self.push(field, message.to_string());
                    }
                }
                default
            }
        }
    }

    /// GeoJSON point with exactly two coordinates; `check_range` additionally
    /// enforces longitude/latitude bounds.
    pub fn point(
        &mut self,
        field: &str,
        draft: Option<&GeoJsonDraft>,
        check_range: bool,
        message: &str,
    ) -> GeoJsonPoint {
        let coordinates_field = format!("{}.coordinates", field);

        let Some(draft) = draft else {
            self.push(&coordinates_field, "Coordinates are required");
            return GeoJsonPoint::new(0.0, 0.0);
        };

        if let Some(kind) = draft.kind.as_deref() {
            if kind != "Point" {
                self.push(
                    &format!("{}.type", field),
                    format!("`{}` is not a valid enum value for path `{}.type`.", kind, field),
                );
            }
        }

        match draft.coordinates.as_deref() {
            None => {
                self.push(&coordinates_field, "Coordinates are required");
                GeoJsonPoint::new(0.0, 0.0)
            }
            Some([lon, lat]) => {
                let in_range = (-180.0..=180.0).contains(lon) && (-90.0..=90.0).contains(lat);
                if check_range && !in_range {
                    self.push(&coordinates_field, message);
                }
                GeoJsonPoint::new(*lon, *lat)
            }
            Some(_) => {
                self.push(&coordinates_field, message);
                GeoJsonPoint::new(0.0, 0.0)
            }
        }
    }

    /// Return `value` when no check failed
    pub fn finish<T>(self, value: T) -> Result<T> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

fn required_message(field: &str, message: Option<&str>) -> String {
    message
        .map(str::to_string)
        .unwrap_or_else(|| format!("Path `{}` is required.", field))
}

/// Recursively overlay `patch` onto `base`. Objects merge key by key; any
/// other value replaces what was there.
pub fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                match base_map.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_json(existing, value)
                    }
                    _ => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}
