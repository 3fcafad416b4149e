//! Hospital directory model and vaccination centre listings.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Maximum length of a hospital name.
pub const HOSPITAL_NAME_MAX: usize = 50;
/// Maximum length of a postal code.
pub const POSTAL_CODE_MAX: usize = 5;

fn article(field: &str) -> &'static str {
    if field.starts_with(['a', 'e', 'i', 'o', 'u']) {
        "an"
    } else {
        "a"
    }
}

/// Validation errors raised while building hospital drafts and patches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HospitalValidationError {
    #[error("Please add {} {field}", article(field))]
    Missing { field: &'static str },
    #[error("{field} can not be more than {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Hospital identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HospitalId(Uuid);

impl HospitalId {
    /// Parse an identifier taken from a path segment; `None` when malformed.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for HospitalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Hospital record as stored in the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hospital {
    pub id: HospitalId,
    pub name: String,
    pub address: String,
    pub district: String,
    pub province: String,
    pub postalcode: String,
    pub tel: Option<String>,
    pub region: String,
    pub created_at: DateTime<Utc>,
}

impl Hospital {
    /// Projection embedded in appointment responses.
    pub fn summary(&self) -> HospitalSummary {
        HospitalSummary {
            id: self.id,
            name: self.name.clone(),
            province: self.province.clone(),
            tel: self.tel.clone(),
        }
    }

    /// Apply a validated patch in place.
    pub fn apply(&mut self, patch: HospitalPatch) {
        let HospitalPatch {
            name,
            address,
            district,
            province,
            postalcode,
            tel,
            region,
        } = patch;
        if let Some(value) = name {
            self.name = value;
        }
        if let Some(value) = address {
            self.address = value;
        }
        if let Some(value) = district {
            self.district = value;
        }
        if let Some(value) = province {
            self.province = value;
        }
        if let Some(value) = postalcode {
            self.postalcode = value;
        }
        if let Some(value) = tel {
            self.tel = Some(value);
        }
        if let Some(value) = region {
            self.region = value;
        }
    }
}

/// Hospital projection `{id, name, province, tel}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HospitalSummary {
    pub id: HospitalId,
    pub name: String,
    pub province: String,
    pub tel: Option<String>,
}

/// Raw hospital fields as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HospitalFields {
    pub name: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub postalcode: Option<String>,
    pub tel: Option<String>,
    pub region: Option<String>,
}

fn required(
    value: Option<String>,
    field: &'static str,
) -> Result<String, HospitalValidationError> {
    optional(value, field)?.ok_or(HospitalValidationError::Missing { field })
}

fn optional(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<String>, HospitalValidationError> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Err(HospitalValidationError::Missing { field })
            } else {
                Ok(Some(trimmed.to_owned()))
            }
        }
    }
}

fn bounded(
    value: Option<String>,
    field: &'static str,
    max: usize,
) -> Result<Option<String>, HospitalValidationError> {
    let value = optional(value, field)?;
    if value.as_ref().is_some_and(|v| v.chars().count() > max) {
        return Err(HospitalValidationError::TooLong { field, max });
    }
    Ok(value)
}

/// Validated payload for creating a hospital.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HospitalDraft {
    pub name: String,
    pub address: String,
    pub district: String,
    pub province: String,
    pub postalcode: String,
    pub tel: Option<String>,
    pub region: String,
}

impl HospitalDraft {
    pub fn try_from_fields(fields: HospitalFields) -> Result<Self, HospitalValidationError> {
        let name = bounded(fields.name, "name", HOSPITAL_NAME_MAX)?
            .ok_or(HospitalValidationError::Missing { field: "name" })?;
        let postalcode = bounded(fields.postalcode, "postalcode", POSTAL_CODE_MAX)?
            .ok_or(HospitalValidationError::Missing {
                field: "postalcode",
            })?;
        Ok(Self {
            name,
            address: required(fields.address, "address")?,
            district: required(fields.district, "district")?,
            province: required(fields.province, "province")?,
            postalcode,
            tel: optional(fields.tel, "tel")?,
            region: required(fields.region, "region")?,
        })
    }

    /// Materialise the draft into a stored record.
    pub fn into_hospital(self, id: HospitalId, created_at: DateTime<Utc>) -> Hospital {
        Hospital {
            id,
            name: self.name,
            address: self.address,
            district: self.district,
            province: self.province,
            postalcode: self.postalcode,
            tel: self.tel,
            region: self.region,
            created_at,
        }
    }
}

/// Validated partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HospitalPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub postalcode: Option<String>,
    pub tel: Option<String>,
    pub region: Option<String>,
}

impl HospitalPatch {
    pub fn try_from_fields(fields: HospitalFields) -> Result<Self, HospitalValidationError> {
        Ok(Self {
            name: bounded(fields.name, "name", HOSPITAL_NAME_MAX)?,
            address: optional(fields.address, "address")?,
            district: optional(fields.district, "district")?,
            province: optional(fields.province, "province")?,
            postalcode: bounded(fields.postalcode, "postalcode", POSTAL_CODE_MAX)?,
            tel: optional(fields.tel, "tel")?,
            region: optional(fields.region, "region")?,
        })
    }
}

/// Vaccination centre listed alongside hospitals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VacCenter {
    pub id: i32,
    pub name: String,
    pub tel: Option<String>,
}
