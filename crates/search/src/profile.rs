use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use relevance_dialect::DialectKind;
use serde::Deserialize;

use crate::matchers::{MatcherKind, MatcherParams};
use crate::sets::MatcherSet;

const BUILTIN_DEFAULT: &str = include_str!("../../../profiles/default.toml");

static BUILTIN: Lazy<WeightProfile> = Lazy::new(|| {
    WeightProfile::from_bytes("default", BUILTIN_DEFAULT.as_bytes(), None)
        .expect("builtin default profile must parse")
});

/// Matcher weight tables and scoring constants.
#[derive(Clone, Debug)]
pub struct WeightProfile {
    name: String,
    dialect: DialectKind,
    rating_scale: u32,
    standard: MatcherSet,
    extended: MatcherSet,
    params: MatcherParams,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawProfile {
    #[serde(default)]
    schema_version: Option<u32>,
    name: Option<String>,
    dialect: Option<DialectKind>,
    rating_scale: Option<u32>,
    #[serde(default)]
    standard: BTreeMap<MatcherKind, u32>,
    #[serde(default)]
    extended: BTreeMap<MatcherKind, u32>,
    #[serde(default)]
    times_in_string: Option<RawTimesInString>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
struct RawTimesInString {
    max_occurrences: Option<u32>,
}

impl WeightProfile {
    /// The bundled `profiles/default.toml`.
    #[must_use]
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Loads a user profile and overlays it on the builtin one.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read profile file {}", path.display()))?;
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("custom");
        Self::from_bytes(name, &bytes, Some("default"))
    }

    pub fn from_bytes(profile_name: &str, bytes: &[u8], base: Option<&str>) -> Result<Self> {
        let raw = parse_raw(bytes).with_context(|| {
            format!("Profile '{profile_name}' is not valid JSON/TOML configuration")
        })?;
        let merged_raw = if let Some(base_name) = base {
            let base_raw = builtin_raw(base_name)?;
            merge_raw_profiles(base_raw, raw)
        } else {
            raw
        };
        Self::from_raw(merged_raw, profile_name)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn dialect(&self) -> DialectKind {
        self.dialect
    }

    #[must_use]
    pub const fn rating_scale(&self) -> u32 {
        self.rating_scale
    }

    #[must_use]
    pub const fn params(&self) -> &MatcherParams {
        &self.params
    }

    #[must_use]
    pub const fn standard(&self) -> &MatcherSet {
        &self.standard
    }

    /// The extended table on its own.
    #[must_use]
    pub const fn extended_only(&self) -> &MatcherSet {
        &self.extended
    }

    /// Standard table followed by the extended one; extended weights win.
    #[must_use]
    pub fn extended(&self) -> MatcherSet {
        self.standard.clone().merge(&self.extended)
    }

    #[must_use]
    pub fn with_dialect(mut self, dialect: DialectKind) -> Self {
        self.dialect = dialect;
        self
    }

    #[must_use]
    pub fn with_rating_scale(mut self, rating_scale: u32) -> Self {
        self.rating_scale = rating_scale;
        self
    }

    fn from_raw(raw: RawProfile, fallback_name: &str) -> Result<Self> {
        if let Some(schema_version) = raw.schema_version {
            if schema_version != 1 {
                return Err(anyhow!(
                    "profile.schema_version {schema_version} is not supported (expected 1)"
                ));
            }
        }

        let name = raw
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| fallback_name.to_string());

        let standard = MatcherSet::custom(raw.standard)
            .with_context(|| format!("Invalid standard weights in profile '{name}'"))?;
        let extended = MatcherSet::custom(raw.extended)
            .with_context(|| format!("Invalid extended weights in profile '{name}'"))?;

        let defaults = MatcherParams::default();
        let max_occurrences = raw
            .times_in_string
            .and_then(|t| t.max_occurrences)
            .unwrap_or(defaults.max_occurrences);
        if max_occurrences == 0 {
            return Err(anyhow!(
                "times_in_string.max_occurrences must be at least 1 in profile '{name}'"
            ));
        }

        Ok(Self {
            name,
            dialect: raw.dialect.unwrap_or_default(),
            rating_scale: raw.rating_scale.unwrap_or(15),
            standard,
            extended,
            params: MatcherParams { max_occurrences },
        })
    }
}

impl Default for WeightProfile {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_raw(name: &str) -> Result<RawProfile> {
    match name {
        "default" => parse_raw(BUILTIN_DEFAULT.as_bytes()),
        other => Err(anyhow!("Base profile '{other}' not bundled")),
    }
}

fn merge_raw_profiles(mut base: RawProfile, overlay: RawProfile) -> RawProfile {
    base.standard.extend(overlay.standard);
    base.extended.extend(overlay.extended);

    let times_in_string = match (base.times_in_string, overlay.times_in_string) {
        (Some(base), Some(overlay)) => Some(RawTimesInString {
            max_occurrences: overlay.max_occurrences.or(base.max_occurrences),
        }),
        (base, overlay) => overlay.or(base),
    };

    RawProfile {
        schema_version: overlay.schema_version.or(base.schema_version),
        name: overlay.name,
        dialect: overlay.dialect.or(base.dialect),
        rating_scale: overlay.rating_scale.or(base.rating_scale),
        standard: base.standard,
        extended: base.extended,
        times_in_string,
    }
}

fn parse_raw(bytes: &[u8]) -> Result<RawProfile> {
    let value: serde_json::Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(json_err) => {
            let utf8 = std::str::from_utf8(bytes).map_err(|err| anyhow!("{json_err}; {err}"))?;
            let toml_value: toml::Value = toml::from_str(utf8).map_err(|toml_err| {
                anyhow!(
                    "Profile is not valid JSON or TOML ({json_err}); TOML parse error: {toml_err}"
                )
            })?;
            serde_json::to_value(toml_value)
                .map_err(|err| anyhow!("Failed to convert TOML profile to JSON: {err}"))?
        }
    };

    validate_profile_value(&value)?;
    serde_json::from_value(value).map_err(|err| anyhow!("Profile parse error: {err}"))
}

fn validate_profile_value(value: &serde_json::Value) -> Result<()> {
    fn validate_object_keys(
        unknown: &mut Vec<String>,
        obj: &serde_json::Map<String, serde_json::Value>,
        base: &str,
        allowed: &[&str],
    ) {
        for key in obj.keys() {
            if !allowed.iter().any(|a| a == &key.as_str()) {
                if base.is_empty() {
                    unknown.push(key.to_string());
                } else {
                    unknown.push(format!("{base}.{key}"));
                }
            }
        }
    }

    let serde_json::Value::Object(root) = value else {
        return Err(anyhow!("Profile config must be a JSON object"));
    };

    let mut unknown = Vec::new();
    validate_object_keys(
        &mut unknown,
        root,
        "",
        &[
            "schema_version",
            "name",
            "dialect",
            "rating_scale",
            "standard",
            "extended",
            "times_in_string",
        ],
    );

    let matcher_names: Vec<&str> = MatcherKind::ALL.iter().map(|kind| kind.as_str()).collect();
    for table in ["standard", "extended"] {
        if let Some(serde_json::Value::Object(obj)) = root.get(table) {
            validate_object_keys(&mut unknown, obj, table, &matcher_names);
        }
    }
    if let Some(serde_json::Value::Object(obj)) = root.get("times_in_string") {
        validate_object_keys(&mut unknown, obj, "times_in_string", &["max_occurrences"]);
    }

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(
            "Profile config has unknown fields: {}",
            unknown.join(", ")
        ))
    }
}
