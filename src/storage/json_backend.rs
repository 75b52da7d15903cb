use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use uuid::Uuid;

use crate::{
    billing::{normalize_cycle, CycleDefinition, SubscriptionRecord},
    core::{portfolio::CURRENT_SCHEMA_VERSION, Portfolio},
    errors::StoreError,
    utils::{ensure_dir, portfolios_dir_in, resolve_base},
};

use super::{RecordStore, Result};

const FILE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// File-per-portfolio JSON store.
///
/// Rows whose cycle tag or duration cannot be validated are loaded with `fallback_cycle`
/// instead of failing the whole file.
#[derive(Clone)]
pub struct JsonStore {
    root: PathBuf,
    portfolios_dir: PathBuf,
    fallback_cycle: CycleDefinition,
}

impl JsonStore {
    pub fn new(root: Option<PathBuf>, fallback_cycle: CycleDefinition) -> Result<Self> {
        let app_root = resolve_base(root);
        ensure_dir(&app_root)?;
        let portfolios_dir = portfolios_dir_in(&app_root);
        ensure_dir(&portfolios_dir)?;
        Ok(Self {
            root: app_root,
            portfolios_dir,
            fallback_cycle,
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, CycleDefinition::default())
    }

    pub fn portfolio_path(&self, name: &str) -> PathBuf {
        self.portfolios_dir
            .join(format!("{}.{}", canonical_name(name), FILE_EXTENSION))
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn fallback_cycle(&self) -> CycleDefinition {
        self.fallback_cycle
    }

    pub fn load_from_path(&self, path: &Path) -> Result<Portfolio> {
        load_portfolio_from_path(path, self.fallback_cycle)
    }

    pub fn save_to_path(&self, portfolio: &Portfolio, path: &Path) -> Result<()> {
        save_portfolio_to_path(portfolio, path)
    }
}

impl RecordStore for JsonStore {
    fn save(&self, portfolio: &Portfolio, name: &str) -> Result<()> {
        save_portfolio_to_path(portfolio, &self.portfolio_path(name))
    }

    fn load(&self, name: &str) -> Result<Portfolio> {
        let path = self.portfolio_path(name);
        if !path.exists() {
            return Err(StoreError::Storage(format!(
                "portfolio `{}` not found",
                name
            )));
        }
        load_portfolio_from_path(&path, self.fallback_cycle)
    }

    fn list(&self) -> Result<Vec<String>> {
        if !self.portfolios_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.portfolios_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

pub fn save_portfolio_to_path(portfolio: &Portfolio, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(&PortfolioFile::from_portfolio(portfolio))?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), records = portfolio.records.len(), "saved portfolio");
    Ok(())
}

pub fn load_portfolio_from_path(path: &Path, fallback: CycleDefinition) -> Result<Portfolio> {
    let data = fs::read_to_string(path)?;
    let file: PortfolioFile = serde_json::from_str(&data)?;
    if file.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::Storage(format!(
            "portfolio `{}` is from a newer schema version",
            path.display()
        )));
    }
    Ok(file.into_portfolio(fallback))
}

/// On-disk shape of a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioFile {
    #[serde(default = "PortfolioFile::schema_version_default")]
    pub schema_version: u8,
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub records: Vec<RecordRow>,
}

impl PortfolioFile {
    fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    pub fn from_portfolio(portfolio: &Portfolio) -> Self {
        Self {
            schema_version: portfolio.schema_version,
            id: portfolio.id,
            name: portfolio.name.clone(),
            created_at: portfolio.created_at,
            updated_at: portfolio.updated_at,
            records: portfolio.records.iter().map(RecordRow::from_record).collect(),
        }
    }

    pub fn into_portfolio(self, fallback: CycleDefinition) -> Portfolio {
        Portfolio {
            id: self.id,
            name: self.name,
            records: self
                .records
                .into_iter()
                .map(|row| row.into_record(fallback))
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            schema_version: self.schema_version,
        }
    }
}

/// On-disk shape of a subscription: the cycle is kept as a raw tag plus multiplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRow {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub cycle_type: String,
    pub cycle_duration: i64,
    pub start_date: NaiveDate,
    pub next_renewal_date: NaiveDate,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_paused: bool,
    #[serde(default)]
    pub auto_renewal: bool,
    #[serde(default)]
    pub one_time: bool,
}

fn default_true() -> bool {
    true
}

impl RecordRow {
    pub fn from_record(record: &SubscriptionRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            price: record.price,
            cycle_type: record.cycle.kind().as_str().to_string(),
            cycle_duration: i64::from(record.cycle.duration()),
            start_date: record.start_date,
            next_renewal_date: record.next_renewal_date,
            is_active: record.is_active,
            is_paused: record.is_paused,
            auto_renewal: record.auto_renewal,
            one_time: record.one_time,
        }
    }

    /// Converts the row, substituting `fallback` for an invalid cycle and zero for a negative
    /// price.
    pub fn into_record(self, fallback: CycleDefinition) -> SubscriptionRecord {
        let cycle = match normalize_cycle(&self.cycle_type, self.cycle_duration) {
            Ok(cycle) => cycle,
            Err(err) => {
                tracing::warn!(
                    id = %self.id,
                    cycle_type = %self.cycle_type,
                    cycle_duration = self.cycle_duration,
                    fallback = %fallback,
                    "{err}; using fallback cycle"
                );
                fallback
            }
        };
        let price = if self.price < Decimal::ZERO {
            tracing::warn!(id = %self.id, price = %self.price, "negative price loaded as zero");
            Decimal::ZERO
        } else {
            self.price
        };
        SubscriptionRecord {
            id: self.id,
            name: self.name,
            price,
            cycle,
            start_date: self.start_date,
            next_renewal_date: self.next_renewal_date,
            is_active: self.is_active,
            is_paused: self.is_paused,
            auto_renewal: self.auto_renewal,
            one_time: self.one_time,
        }
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "portfolio".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
