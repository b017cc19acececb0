// Файл: crates/cityzilla_index/src/record.rs
use crate::RecordId;
use crate::normalizer::normalize_text;
use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer, Serialize};

/// Сырая запись из входного JSON. Все поля необязательные:
/// валидация происходит при конвертации в [`CityRecord`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceEntry {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default, alias = "libelleCommune")]
    pub libelle_commune: Option<String>,
    #[serde(default, alias = "codeDepartement", deserialize_with = "string_or_number")]
    pub code_departement: Option<String>,
    #[serde(default, alias = "libelleDepartement")]
    pub libelle_departement: Option<String>,
    #[serde(default, alias = "codeCommune", deserialize_with = "string_or_number")]
    pub code_commune: Option<String>,
}

/// Провалидированная запись, пригодная для индексации
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityRecord {
    pub id: RecordId,
    pub name: String,
    pub alt_name: Option<String>,
    pub department_code: String,
    pub commune_code: String,
}

/// То, что нужно индексу и ранкеру от записи
pub trait Indexable {
    fn record_id(&self) -> RecordId;
    fn display_name(&self) -> &str;
    fn department_code(&self) -> &str;
}

impl Indexable for CityRecord {
    fn record_id(&self) -> RecordId {
        self.id
    }
    fn display_name(&self) -> &str {
        &self.name
    }
    fn department_code(&self) -> &str {
        &self.department_code
    }
}

impl TryFrom<&SourceEntry> for CityRecord {
    type Error = anyhow::Error;

    fn try_from(e: &SourceEntry) -> Result<Self> {
        let Some(id) = e.id else {
            bail!("entry without id");
        };
        let name = match e.libelle_commune.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => bail!("entry {id}: missing libelle_commune"),
        };
        Ok(Self {
            id,
            alt_name: abbreviated_name(&name),
            name,
            department_code: e.code_departement.clone().unwrap_or_default(),
            commune_code: e.code_commune.clone().unwrap_or_default(),
        })
    }
}

/// Поля, по которым строится индекс: имя, альтернативное имя, коды.
/// Значения уже нормализованы.
pub fn search_fields(r: &CityRecord) -> Vec<String> {
    let mut out = Vec::with_capacity(4);
    out.push(normalize_text(&r.name));
    if let Some(alt) = &r.alt_name {
        out.push(normalize_text(alt));
    }
    out.push(normalize_text(&r.department_code));
    out.push(normalize_text(&r.commune_code));
    out
}

/// "Saint-Malo" -> "St-Malo", "Sainte-Foy" -> "Ste-Foy".
/// None, если сокращать нечего.
pub fn abbreviated_name(name: &str) -> Option<String> {
    const SEPS: [char; 3] = ['-', ' ', '\''];
    let mut changed = false;
    let out: String = name
        .split_inclusive(SEPS)
        .map(|part| {
            let word = part.trim_end_matches(SEPS);
            let sep = &part[word.len()..];
            let short = match word {
                "Saint" | "saint" => Some("St"),
                "Sainte" | "sainte" => Some("Ste"),
                _ => None,
            };
            match short {
                Some(s) => {
                    changed = true;
                    format!("{s}{sep}")
                }
                None => part.to_string(),
            }
        })
        .collect();
    changed.then_some(out)
}

// коды департаментов/коммун встречаются и строкой ("2A"), и числом (75)
fn string_or_number<'de, D>(d: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match v {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
